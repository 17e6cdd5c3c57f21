// Copyright 2022 wgconf developers

// This file is part of wgconf.

// wgconf is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// wgconf is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with wgconf.  If not, see <https://www.gnu.org/licenses/>.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use log::info;
use rand::{rngs::OsRng, RngCore};
use std::io::Read;
use std::path::PathBuf;

use crate::editor::{self, keygen, validate, ConfigEditor, TunnelConfig};
use crate::store::TomlStore;

#[derive(Parser)]
#[clap(name = "wgconf", version, about = "WireGuard tunnel configuration editor")]
struct Options {
    #[clap(
        short,
        long,
        value_name = "FILE",
        default_value = "wgconf.toml",
        help = "Configuration store file"
    )]
    store: PathBuf,

    #[clap(long, help = "Set logging (env_logger)", env = "RUST_LOG")]
    log: Option<String>,

    #[clap(
        long,
        value_name = "PATH",
        default_value = "wg",
        env = "WG",
        help = "Key utility invoked for genkey/pubkey"
    )]
    wg_bin: String,

    #[clap(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    #[clap(about = "List stored configurations")]
    List,
    #[clap(about = "Print a stored configuration as TOML")]
    Show { name: String },
    #[clap(about = "Validate a stored configuration")]
    Check { name: String },
    #[clap(about = "Import a configuration from a TOML file")]
    Import { name: String, file: PathBuf },
    #[clap(about = "Delete a stored configuration")]
    Delete { name: String },
    #[clap(about = "Mark a configuration as active")]
    Activate { name: String },
    #[clap(about = "Generate a private key")]
    Genkey,
    #[clap(about = "Calculate public key from the private key read from stdin")]
    Pubkey,
    #[clap(about = "Generate a preshared key")]
    Genpsk,
}

impl Options {
    async fn run(self) -> anyhow::Result<()> {
        match self.cmd {
            Cmd::List => {
                let store = TomlStore::open(&self.store)?;
                let active = editor::active_config(&store);
                for name in editor::list_configs(&store) {
                    if Some(&name) == active.as_ref() {
                        println!("{} (active)", name);
                    } else {
                        println!("{}", name);
                    }
                }
            }
            Cmd::Show { name } => {
                let store = TomlStore::open(&self.store)?;
                let config = load_existing(&store, &name)?;
                print!(
                    "{}",
                    toml::to_string_pretty(&config).context("failed to serialize configuration")?
                );
            }
            Cmd::Check { name } => {
                let store = TomlStore::open(&self.store)?;
                let mut config = load_existing(&store, &name)?;
                // The store never holds the public key; derive it so the
                // interface checks can run.
                if validate::is_key(&config.private_key) {
                    config.public_key =
                        keygen::derive_public_key(&self.wg_bin, &config.private_key).await?;
                }
                report_problems(&config)?;
                println!("{}: ok", name);
            }
            Cmd::Import { name, file } => {
                let text = std::fs::read_to_string(&file)
                    .with_context(|| format!("failed to read {}", file.display()))?;
                let mut config: TunnelConfig =
                    toml::from_str(&text).context("failed to parse configuration")?;
                config.name = name;
                if validate::is_key(&config.private_key) {
                    config.public_key =
                        keygen::derive_public_key(&self.wg_bin, &config.private_key).await?;
                }
                report_problems(&config)?;

                let mut store = TomlStore::open(&self.store)?;
                let mut editor = ConfigEditor::from_config(config, &self.wg_bin);
                editor.commit(&mut store)?;
                store.save()?;
            }
            Cmd::Delete { name } => {
                let mut store = TomlStore::open(&self.store)?;
                if editor::delete_config(&mut store, &name)? {
                    store.save()?;
                    info!("deleted configuration {}", name);
                } else {
                    println!("{}: not deleted", name);
                }
            }
            Cmd::Activate { name } => {
                let mut store = TomlStore::open(&self.store)?;
                editor::set_active(&mut store, &name)?;
                store.save()?;
            }
            Cmd::Genkey => {
                println!("{}", keygen::generate_private_key(&self.wg_bin).await?);
            }
            Cmd::Pubkey => {
                let mut buffer = String::new();
                std::io::stdin()
                    .read_to_string(&mut buffer)
                    .context("failed to read private key from stdin")?;
                println!(
                    "{}",
                    keygen::derive_public_key(&self.wg_bin, buffer.trim()).await?
                );
            }
            Cmd::Genpsk => {
                let mut k = [0u8; 32];
                OsRng.fill_bytes(&mut k);
                println!("{}", base64::encode(&k));
            }
        }
        Ok(())
    }
}

fn load_existing(store: &TomlStore, name: &str) -> anyhow::Result<TunnelConfig> {
    use crate::store::{config_root, ConfigStore};
    if !store.dir_exists(&config_root(name))? {
        bail!("no configuration named {:?}", name);
    }
    Ok(editor::load_config(store, name))
}

fn report_problems(config: &TunnelConfig) -> anyhow::Result<()> {
    let problems = validate::config_problems(config);
    if problems.is_empty() {
        return Ok(());
    }
    for p in &problems {
        eprintln!("  {}", p);
    }
    bail!("configuration {:?} is invalid", config.name);
}

pub fn real_main() -> anyhow::Result<()> {
    let options = Options::parse();

    if let Some(ref log) = options.log {
        std::env::set_var("RUST_LOG", log);
    }
    let mut builder = env_logger::Builder::from_default_env();
    builder.format_timestamp_millis();
    builder.init();

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(options.run())
}
