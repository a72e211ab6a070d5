use anyhow::Result;
use clap::{Parser, Subcommand};
use pomod_ipc::{Command, IpcError, SOCKET_PATH};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pomodctl")]
#[command(about = "Control the pomod timer", long_about = None)]
struct Cli {
    /// Path of the daemon socket
    #[arg(long, default_value = SOCKET_PATH)]
    socket: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start or pause the current period
    Toggle,
    /// End the current period now and switch mode
    Finish,
    /// Print the timer status as JSON
    Status,
}

impl From<Commands> for Command {
    fn from(command: Commands) -> Self {
        match command {
            Commands::Toggle => Command::Toggle,
            Commands::Finish => Command::Finish,
            Commands::Status => Command::Status,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match pomod_ipc::request(&cli.socket, cli.command.into()).await {
        Ok(Some(reply)) => println!("{}", reply),
        Ok(None) => {}
        Err(IpcError::ConnectionRefused) => {
            println!("{}", IpcError::ConnectionRefused);
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_subcommand_with_default_socket() {
        let cli = Cli::try_parse_from(["pomodctl", "status"]).unwrap();
        assert_eq!(cli.socket, PathBuf::from(SOCKET_PATH));
        assert_eq!(Command::from(cli.command), Command::Status);
    }

    #[test]
    fn accepts_socket_override() {
        let cli = Cli::try_parse_from(["pomodctl", "--socket", "/tmp/other.sock", "finish"]).unwrap();
        assert_eq!(cli.socket, PathBuf::from("/tmp/other.sock"));
        assert_eq!(Command::from(cli.command), Command::Finish);
    }

    #[test]
    fn rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["pomodctl", "foo"]).is_err());
        assert!(Cli::try_parse_from(["pomodctl"]).is_err());
    }
}
