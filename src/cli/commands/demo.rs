//! Demo data and maintenance commands: `seed-demo` and `reset`.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;

use crate::cli::output::{output, CommandOutput};
use crate::cli::{open_repository, resolve_namespace};
use crate::domain::models::{Config, Namespace};
use crate::domain::ports::SampleRepository;
use crate::services::DemoSeeder;

#[derive(Args, Debug)]
pub struct SeedDemoArgs {
    /// Namespace to seed; anything but test is refused
    #[arg(short, long, default_value = "test")]
    pub namespace: String,
}

#[derive(Args, Debug)]
pub struct ResetArgs {
    /// Namespace to purge (production, test)
    #[arg(short, long)]
    pub namespace: String,

    /// Confirm deletion of every sample in the namespace
    #[arg(long)]
    pub yes: bool,
}

#[derive(Debug, serde::Serialize)]
pub struct MaintenanceOutput {
    pub success: bool,
    pub namespace: Namespace,
    pub rows: u64,
    pub message: String,
}

impl CommandOutput for MaintenanceOutput {
    fn to_human(&self) -> String {
        self.message.clone()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn seed_demo(args: SeedDemoArgs, config: Config, json_mode: bool) -> Result<()> {
    let namespace = resolve_namespace(&config, Some(&args.namespace))?;
    let repository = open_repository(&config).await?;
    let seeder = DemoSeeder::new(repository, config.configured_entities());

    let rows = seeder.seed(namespace, Utc::now()).await?;
    let out = MaintenanceOutput {
        success: true,
        namespace,
        rows,
        message: format!(
            "Seeded {rows} samples for {} entities into the {namespace} namespace",
            seeder.entities().len()
        ),
    };
    output(&out, json_mode);
    Ok(())
}

pub async fn reset(args: ResetArgs, config: Config, json_mode: bool) -> Result<()> {
    let namespace = resolve_namespace(&config, Some(&args.namespace))?;
    if !args.yes {
        anyhow::bail!("Refusing to delete every sample in the {namespace} namespace without --yes");
    }

    let repository = open_repository(&config).await?;
    let rows = repository
        .purge(namespace)
        .await
        .with_context(|| format!("Failed to purge the {namespace} namespace"))?;
    tracing::info!(%namespace, rows, "namespace reset");

    let out = MaintenanceOutput {
        success: true,
        namespace,
        rows,
        message: format!("Deleted {rows} samples from the {namespace} namespace"),
    };
    output(&out, json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_in(dir: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.database.production_path = dir.join("prod.db").to_string_lossy().into_owned();
        config.database.test_path = dir.join("test.db").to_string_lossy().into_owned();
        config
    }

    #[tokio::test]
    async fn test_reset_requires_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let args = ResetArgs {
            namespace: "test".into(),
            yes: false,
        };
        let err = reset(args, config_in(dir.path()), true).await.unwrap_err();
        assert!(err.to_string().contains("--yes"));
        assert!(!dir.path().join("test.db").exists());
    }

    #[tokio::test]
    async fn test_seed_demo_refuses_production() {
        let dir = tempfile::tempdir().unwrap();
        let args = SeedDemoArgs {
            namespace: "production".into(),
        };
        let err = seed_demo(args, config_in(dir.path()), true).await.unwrap_err();
        assert!(err.to_string().contains("Forbidden"));
    }

    #[tokio::test]
    async fn test_seed_then_reset() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        seed_demo(SeedDemoArgs { namespace: "test".into() }, config.clone(), true)
            .await
            .unwrap();
        let repository = open_repository(&config).await.unwrap();
        assert_eq!(repository.distinct_entities(Namespace::Test).await.unwrap().len(), 18);

        reset(
            ResetArgs {
                namespace: "test".into(),
                yes: true,
            },
            config,
            true,
        )
        .await
        .unwrap();
        assert!(repository.distinct_entities(Namespace::Test).await.unwrap().is_empty());
    }
}
