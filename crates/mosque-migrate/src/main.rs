//! mosque-migrate binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite store, and runs one command against it.
//!
//! # Password hash generation
//!
//! `user` seed rows carry an argon2 PHC string, not a password:
//!
//! ```
//! cargo run -p mosque-migrate -- hash-password
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use clap::{Parser, Subcommand};
use mosque_core::{
  MosqueId, TenantScope, enums::Declared as _, relatives::relatives,
  store::MosqueStore,
};
use mosque_migrate::{Changelog, MigrateConfig, RoleDump, runner};
use mosque_store_sqlite::SqliteStore;
use rand_core::OsRng;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Mosque registry migrations")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Act for this mosque only. Overrides `mosque_id` from the config.
  #[arg(short, long)]
  mosque: Option<i64>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Apply the changelog and print what was done.
  Migrate {
    /// Changelog to apply instead of the configured one.
    #[arg(long)]
    changelog: Option<PathBuf>,
  },
  /// List applied changesets.
  Status,
  /// Dump roles, users with their roles, and the admin user's roles.
  Roles,
  /// Print the parents, spouses, children and siblings of an individual.
  Relatives {
    /// GEDCOM xref, e.g. `@I1@`.
    id: String,
  },
  /// Print the argon2 hash for a password entered on stdin.
  HashPassword,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  if let Command::HashPassword = cli.command {
    let password = read_password()?;
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?
      .to_string();
    println!("{hash}");
    return Ok(());
  }

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("MOSQUE"))
    .build()
    .context("failed to read config file")?;

  let cfg: MigrateConfig = settings
    .try_deserialize()
    .context("failed to deserialise MigrateConfig")?;

  let scope = TenantScope::from(cli.mosque.or(cfg.mosque_id).map(MosqueId));
  let store_path = expand_tilde(&cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  match cli.command {
    Command::Migrate { changelog } => {
      let path = expand_tilde(changelog.as_deref().unwrap_or(cfg.changelog.as_path()));
      let changelog = Changelog::load(&path)
        .with_context(|| format!("failed to load changelog {path:?}"))?;
      tracing::info!(
        changelog = %path.display(),
        changesets = changelog.changesets.len(),
        ?scope,
        "running migrations"
      );
      let report = runner::run(&store, &changelog, scope)
        .await
        .context("migration failed")?;
      println!("{report}");
    }
    Command::Status => {
      let applied = store.list_changesets().await?;
      if applied.is_empty() {
        println!("no changesets applied");
      }
      for c in applied {
        println!(
          "{}  {:<40} {:>5} rows  {}  {}",
          c.applied_at.format("%Y-%m-%d %H:%M:%S"),
          c.id,
          c.row_count,
          &c.checksum[..12.min(c.checksum.len())],
          c.author.as_deref().unwrap_or("-"),
        );
      }
    }
    Command::Roles => {
      let dump = RoleDump::collect(&store).await?;
      println!("{dump}");
      if !dump.admin_ok() {
        tracing::error!("admin user is missing or has no roles");
      }
    }
    Command::Relatives { id } => {
      let Some(r) = relatives(&store, scope, &id).await? else {
        anyhow::bail!("individual {id} not found");
      };
      println!("{} ({})", r.individual.display_name(), r.individual.id);
      for p in &r.parents {
        println!("  parent   {} {}", p.id, p.display_name());
      }
      for s in &r.spouses {
        println!(
          "  spouse   {} {}  [{}]",
          s.individual.id,
          s.individual.display_name(),
          s.family_id
        );
      }
      for c in &r.children {
        println!(
          "  child    {} {}  [{}, {}]",
          c.individual.id,
          c.individual.display_name(),
          c.family_id,
          c.relationship_type.as_str()
        );
      }
      for s in &r.siblings {
        println!("  sibling  {} {}", s.id, s.display_name());
      }
    }
    // Handled before the store is opened.
    Command::HashPassword => {}
  }

  Ok(())
}

/// Read a password from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  let stdin = io::stdin();
  eprint!("Password: ");
  io::stderr().flush().ok();
  let mut line = String::new();
  stdin.lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
