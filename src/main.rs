// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
#![deny(elided_lifetimes_in_paths)]
#![warn(
    rust_2018_idioms,
    future_incompatible,
    unused,
    unused_lifetimes,
    unused_qualifications,
    unused_results,
    anonymous_parameters,
    deprecated_in_future,
    elided_lifetimes_in_paths,
    explicit_outlives_requirements,
    keyword_idents,
    macro_use_extern_crate,
    missing_doc_code_examples,
    private_doc_tests,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::unseparated_literal_suffix,
    clippy::decimal_literal_representation,
    clippy::single_char_lifetime_names,
    clippy::fallible_impl_from,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::wildcard_enum_match_arm,
    clippy::deref_by_slicing,
    clippy::default_numeric_fallback,
    clippy::shadow_reuse,
    clippy::clone_on_ref_ptr,
    clippy::todo,
    clippy::string_add,
    clippy::use_debug,
    clippy::future_not_send
)]
#![cfg_attr(not(test), warn(clippy::panic_in_result_fn))]

mod cart;
mod command;
mod content;
mod context;
mod error;
mod gateway;
mod menu;
mod metadata;
mod model;
mod nav;
mod orders;
mod password;
mod reviews;
mod session;
mod storage;
mod team;
mod transport;

use std::{path::PathBuf, process, sync::Arc};

use async_trait::async_trait;
use clap::{Parser, Subcommand};
use context::Context;
use error::Result;
use log::{error, info, warn};
use storage::IsPersistent as _;
use url::Url;

#[derive(Debug, Subcommand)]
enum Command {
    Login(command::auth::Login),
    Register(command::auth::Register),
    Logout(command::auth::Logout),
    Whoami(command::auth::Whoami),
    Menu(command::menu::Command),
    Cart(command::cart::Command),
    Checkout(command::checkout::Command),
    Orders(command::orders::Command),
    Admin(command::admin::Command),
    Reviews(command::reviews::Command),
    Team(command::team::Command),
    Content(command::content::Content),
    Feedback(command::content::Feedback),
}

#[async_trait]
impl command::Command for Command {
    async fn execute(self, ctx: &mut Context) -> Result<()> {
        match self {
            Self::Login(cmd) => cmd.execute(ctx).await,
            Self::Register(cmd) => cmd.execute(ctx).await,
            Self::Logout(cmd) => cmd.execute(ctx).await,
            Self::Whoami(cmd) => cmd.execute(ctx).await,
            Self::Menu(cmd) => cmd.execute(ctx).await,
            Self::Cart(cmd) => cmd.execute(ctx).await,
            Self::Checkout(cmd) => cmd.execute(ctx).await,
            Self::Orders(cmd) => cmd.execute(ctx).await,
            Self::Admin(cmd) => cmd.execute(ctx).await,
            Self::Reviews(cmd) => cmd.execute(ctx).await,
            Self::Team(cmd) => cmd.execute(ctx).await,
            Self::Content(cmd) => cmd.execute(ctx).await,
            Self::Feedback(cmd) => cmd.execute(ctx).await,
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// The base URL of the Santapin API.
    #[arg(long, env = "SANTAPIN_URL", default_value = "http://localhost:8000/api", value_parser = Url::parse)]
    url: Url,

    /// Keep the session and orders in memory only, forgetting them when the
    /// command finishes.
    #[arg(long)]
    no_persist: bool,

    /// Where to keep the session and cached content when no keyring is
    /// available. Defaults to the platform's data directory.
    #[arg(long, env = "SANTAPIN_STATE_DIR", value_hint = clap::ValueHint::DirPath)]
    state_dir: Option<PathBuf>,

    /// The path to the Pinentry program to use when asking for passwords.
    #[arg(long, value_hint = clap::ValueHint::ExecutablePath)]
    pinentry_program: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

async fn get_storage(args: &Args) -> Box<dyn storage::Storage> {
    if !args.no_persist {
        if let Some(dir) = &args.state_dir {
            return Box::new(storage::File::new_in(dir));
        }

        #[cfg(feature = "secret-service")]
        match storage::SecretService::new(&args.url).await {
            Ok(secret_service_storage) => return Box::new(secret_service_storage),
            Err(e) => {
                warn!("We need to fall back to unencrypted file storage because we can't connect to the secret service: {}", e);
            }
        }

        #[cfg(feature = "keychain")]
        match storage::Keychain::new(&args.url) {
            Ok(keychain_storage) => return Box::new(keychain_storage),
            Err(e) => {
                warn!("We need to fall back to unencrypted file storage because we can't connect to Keychain: {}", e);
            }
        }

        match storage::File::new() {
            Ok(file_storage) => return Box::new(file_storage),
            Err(e) => {
                warn!("Nothing will be saved between commands: {}", e);
            }
        }
    }

    Box::new(storage::Memory::new())
}

async fn run(args: Args) -> Result<()> {
    let prompt: Vec<Box<dyn password::Prompt>> = vec![
        Box::new(args.pinentry_program.clone().map_or_else(
            password::PinentryPrompt::new,
            password::PinentryPrompt::new_with_executable,
        )),
        Box::new(password::RpasswordPrompt),
    ];

    let storage = get_storage(&args).await;
    if !storage.is_persistent() {
        info!("The session will not outlive this command");
    }
    let transport = transport::Http::new(args.url.clone())?;

    let mut ctx = Context::new(
        Arc::new(transport),
        storage::shared(storage),
        Box::new(prompt),
    )
    .await?;
    command::Command::execute(args.command, &mut ctx).await
}

#[tokio::main]
async fn main() {
    let logger_env = env_logger::Env::new()
        .filter_or("SANTAPIN_LOG", "warn")
        .write_style("SANTAPIN_LOG_STYLE");
    env_logger::Builder::from_env(logger_env).init();

    if let Err(e) = run(Args::parse()).await {
        error!("We encountered an error: {}", e);
        process::exit(1);
    };
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn arguments_are_consistent() {
        Args::command().debug_assert();
    }
}
