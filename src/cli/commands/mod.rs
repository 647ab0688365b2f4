pub mod logging;

use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        ValueParser,
    },
    Arg, ArgAction, ColorChoice, Command,
};
use url::Url;

pub const ARG_URL: &str = "url";
pub const ARG_SECRET_KEY: &str = "secret-key";
pub const ARG_NONCE: &str = "nonce";
pub const ARG_SHOW_COOKIE: &str = "show-cookie";
pub const ARG_COOKIE: &str = "cookie";

#[must_use]
pub fn validator_url() -> ValueParser {
    ValueParser::from(move |url: &str| -> std::result::Result<Url, String> {
        let parsed = Url::parse(url).map_err(|e| format!("invalid url: {e}"))?;
        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            scheme => Err(format!("unsupported scheme: {scheme}")),
        }
    })
}

fn arg_url() -> Arg {
    Arg::new(ARG_URL)
        .short('u')
        .long("url")
        .help("Mint base URL, example: https://mint.tld")
        .env("SIGAUTH_URL")
        .required(true)
        .value_parser(validator_url())
}

fn arg_secret_key() -> Arg {
    Arg::new(ARG_SECRET_KEY)
        .short('k')
        .long("secret-key")
        .help("Hex-encoded secp256k1 secret key used to sign the login challenge")
        .env("SIGAUTH_SECRET_KEY")
        .hide_env_values(true)
        .required(true)
}

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

    let command = Command::new("sigauth")
        .about("Signed-challenge administrator login")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("login")
                .about("Sign the login challenge and open an admin session")
                .arg(arg_url())
                .arg(arg_secret_key())
                .arg(
                    Arg::new(ARG_NONCE)
                        .short('n')
                        .long("nonce")
                        .help("Challenge nonce; fetched from the login page when omitted")
                        .env("SIGAUTH_NONCE"),
                )
                .arg(
                    Arg::new(ARG_SHOW_COOKIE)
                        .long("show-cookie")
                        .help("Print the session cookie after a successful login")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("logout")
                .about("Close an admin session")
                .arg(arg_url())
                .arg(
                    Arg::new(ARG_COOKIE)
                        .short('c')
                        .long("cookie")
                        .help("Session cookie value returned by login")
                        .env("SIGAUTH_COOKIE")
                        .hide_env_values(true)
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("pubkey")
                .about("Print the public key of the signing key")
                .arg(arg_secret_key()),
        );

    logging::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "sigauth");
        assert_eq!(
            command.get_about().unwrap().to_string(),
            "Signed-challenge administrator login"
        );
        assert_eq!(
            command.get_version().unwrap().to_string(),
            env!("CARGO_PKG_VERSION")
        );
    }

    #[test]
    fn test_login_args() {
        temp_env::with_vars(
            [
                ("SIGAUTH_URL", None::<&str>),
                ("SIGAUTH_SECRET_KEY", None),
                ("SIGAUTH_NONCE", None),
            ],
            || {
                let matches = new().get_matches_from(vec![
                    "sigauth",
                    "login",
                    "--url",
                    "https://mint.tld",
                    "--secret-key",
                    "0101",
                    "--nonce",
                    "abc123",
                    "--show-cookie",
                ]);
                let (name, sub) = matches.subcommand().unwrap();
                assert_eq!(name, "login");
                assert_eq!(
                    sub.get_one::<Url>(ARG_URL).map(Url::as_str),
                    Some("https://mint.tld/")
                );
                assert_eq!(
                    sub.get_one::<String>(ARG_SECRET_KEY).map(String::as_str),
                    Some("0101")
                );
                assert_eq!(
                    sub.get_one::<String>(ARG_NONCE).map(String::as_str),
                    Some("abc123")
                );
                assert!(sub.get_flag(ARG_SHOW_COOKIE));
            },
        );
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("SIGAUTH_URL", Some("http://127.0.0.1:8081")),
                ("SIGAUTH_COOKIE", Some("jwt")),
                ("SIGAUTH_LOG_LEVEL", Some("info")),
            ],
            || {
                let matches = new().get_matches_from(vec!["sigauth", "logout"]);
                let (name, sub) = matches.subcommand().unwrap();
                assert_eq!(name, "logout");
                assert_eq!(
                    sub.get_one::<String>(ARG_COOKIE).map(String::as_str),
                    Some("jwt")
                );
                assert_eq!(
                    sub.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(2)
                );
            },
        );
    }

    #[test]
    fn test_rejects_bad_url() {
        temp_env::with_vars([("SIGAUTH_SECRET_KEY", None::<&str>)], || {
            let result = new().try_get_matches_from(vec![
                "sigauth",
                "login",
                "--url",
                "ftp://mint.tld",
                "--secret-key",
                "01",
            ]);
            assert!(result.is_err());
        });
    }

    #[test]
    fn test_check_log_level_verbosity() {
        // loop cover all possible value_parse
        let levels = vec!["error", "warn", "info", "debug", "trace"];
        for (index, _) in levels.iter().enumerate() {
            temp_env::with_vars([("SIGAUTH_LOG_LEVEL", None::<String>)], || {
                let mut args = vec![
                    "sigauth".to_string(),
                    "pubkey".to_string(),
                    "--secret-key".to_string(),
                    "01".to_string(),
                ];

                if index > 0 {
                    let v = format!("-{}", "v".repeat(index));
                    args.push(v);
                }

                let matches = new().get_matches_from(args);
                let (_, sub) = matches.subcommand().unwrap();

                assert_eq!(
                    sub.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(index as u8)
                );
            });
        }
    }
}
