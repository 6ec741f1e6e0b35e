//! Command-line front end over [`Console`]

use anyhow::{anyhow, bail};

use crate::models::auth::LoginParams;
use crate::utils::format_file_size;
use crate::Console;

const USAGE: &str = "usage: admin-console <health | login <username> <password> | logout | streams | media | errors>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Health,
    Login { username: String, password: String },
    Logout,
    Streams,
    Media,
    /// Probes every list endpoint and prints the resulting error log
    Errors,
}

impl Command {
    pub fn parse(args: &[String]) -> anyhow::Result<Self> {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        match args.as_slice() {
            ["health"] => Ok(Command::Health),
            ["login", username, password] => Ok(Command::Login {
                username: (*username).to_string(),
                password: (*password).to_string(),
            }),
            ["logout"] => Ok(Command::Logout),
            ["streams"] => Ok(Command::Streams),
            ["media"] => Ok(Command::Media),
            ["errors"] => Ok(Command::Errors),
            [] => bail!(USAGE),
            [other, ..] => Err(anyhow!("unknown command '{}'\n{}", other, USAGE)),
        }
    }
}

pub async fn run(console: &Console, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Health => {
            let health = console.api().monitor.get_health_status().await?;
            let status = &health.service_status;
            println!("overall:   {:?}", status.overall);
            println!("storage:   {:?}", status.storage);
            println!("media:     {:?}", status.media);
            println!("transcode: {:?}", status.transcode);
        }
        Command::Login { username, password } => {
            let response = console
                .user()
                .login(&LoginParams::new(username, password))
                .await?;
            println!("logged in as {}", response.user_info.username);
        }
        Command::Logout => {
            console.user().logout().await;
            println!("logged out");
        }
        Command::Streams => {
            let page = console.live().fetch_live_streams(None).await?;
            println!("{} streams", page.total);
            for stream in &page.items {
                println!(
                    "{:<24} {:<10} {:>6} viewers  {}",
                    stream.id,
                    format!("{:?}", stream.status).to_lowercase(),
                    stream.viewer_count,
                    stream.name
                );
            }
        }
        Command::Media => {
            let page = console.media().fetch_media_files(None).await?;
            println!("{} files", page.total);
            for file in &page.items {
                println!(
                    "{:<24} {:<8} {:>10}  {}",
                    file.id,
                    file.file_type.as_str(),
                    format_file_size(file.file_size),
                    file.name
                );
            }
        }
        Command::Errors => {
            let probes = [
                console.api().monitor.get_health_status().await.err(),
                console.live().fetch_live_streams(None).await.err(),
                console.media().fetch_media_files(None).await.err(),
            ];
            let failed = probes.iter().flatten().count();

            let entries = console.app().error_logs();
            if entries.is_empty() {
                println!("no transport errors recorded ({} probes failed)", failed);
            }
            for entry in entries {
                println!("{}", entry);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse(&args(&["health"])).unwrap(), Command::Health);
        assert_eq!(
            Command::parse(&args(&["login", "admin", "secret"])).unwrap(),
            Command::Login {
                username: "admin".into(),
                password: "secret".into()
            }
        );
        assert_eq!(Command::parse(&args(&["errors"])).unwrap(), Command::Errors);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(Command::parse(&args(&[])).is_err());
        assert!(Command::parse(&args(&["login", "admin"])).is_err());
        let err = Command::parse(&args(&["deploy"])).unwrap_err();
        assert!(err.to_string().contains("unknown command 'deploy'"));
    }
}
