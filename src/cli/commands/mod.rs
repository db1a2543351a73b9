pub mod appwrite;
pub mod logging;

use crate::api::DEFAULT_SIGN_IN_ROUTE;
use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        PossibleValuesParser,
    },
    Arg, ColorChoice, Command,
};

pub const ARG_PORT: &str = "port";
pub const ARG_SIGN_IN_ROUTE: &str = "sign-in-route";
pub const ARG_ENVIRONMENT: &str = "environment";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("filedesk")
        .about("File storage with email one-time password sign in")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long(ARG_PORT)
                .help("Port to listen on")
                .default_value("8080")
                .env("FILEDESK_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_SIGN_IN_ROUTE)
                .long(ARG_SIGN_IN_ROUTE)
                .help("Where anonymous and signed-out users are redirected")
                .default_value(DEFAULT_SIGN_IN_ROUTE)
                .env("FILEDESK_SIGN_IN_ROUTE"),
        )
        .arg(
            Arg::new(ARG_ENVIRONMENT)
                .long(ARG_ENVIRONMENT)
                .help("Deployment environment; production marks the session cookie Secure")
                .default_value("development")
                .env("FILEDESK_ENVIRONMENT")
                .value_parser(PossibleValuesParser::new(["development", "production"])),
        );

    let command = appwrite::with_args(command);
    logging::with_args(command)
}
