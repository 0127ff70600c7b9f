use anyhow::Result;
use clap::{Parser, Subcommand};
use devproxy::config::{ConfigFile, LocalMode, RouteConfig};
use log::info;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "devproxy", about, author, version, long_about = None, propagate_version = true)]
pub struct DevProxyArguments {
    #[arg(help = "Working directory holding the configuration, defaults to the current directory")]
    pub(crate) dir: Option<PathBuf>,
    #[arg(short = 'c', long = "config", help = "Path to the configuration file, relative to the working directory")]
    pub(crate) config_path: Option<String>,
    #[arg(short = 'v', long = "verbose", help = "Enable verbose logging")]
    pub(crate) verbose: bool,
    #[command(subcommand)]
    pub(crate) command: Option<DevProxyCommands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum DevProxyCommands {
    #[clap(name = "init", about = "Write a template configuration file")]
    Init,
    #[clap(name = "routes", about = "List the configured proxy instances")]
    Routes,
    #[clap(name = "config", about = "Inspect the configuration file")]
    Config {
        #[clap(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    #[clap(name = "show", about = "Show the current configuration")]
    Show,
    #[clap(name = "show-path", about = "Show the path to the configuration file")]
    ShowPath,
}

impl DevProxyArguments {
    pub fn effective_config_path(&self) -> PathBuf {
        ConfigFile::resolve_config_path(self.dir.clone(), self.config_path.clone())
    }

    pub async fn handle_arguments(&self) -> Result<()> {
        if let Some(command) = &self.command {
            let effective_config_path = self.effective_config_path();
            match command {
                DevProxyCommands::Init => {
                    ConfigFile::save_default(&effective_config_path).await?;
                    info!("Created {}", effective_config_path.display());
                }
                DevProxyCommands::Routes => {
                    let config = ConfigFile::try_load(&effective_config_path).await?;
                    let base_dir = ConfigFile::base_dir(&effective_config_path);
                    for route in config.load_routes(&base_dir)? {
                        println!("{}", format_route(&route));
                    }
                }
                DevProxyCommands::Config { command } => match command {
                    ConfigCommands::Show => {
                        let config = ConfigFile::try_load(&effective_config_path).await?;
                        println!("{}", config);
                    }
                    ConfigCommands::ShowPath => {
                        println!("{}", effective_config_path.to_string_lossy())
                    }
                },
            }
            // Exit after the command has been executed
            std::process::exit(0);
        }
        Ok(())
    }
}

fn format_route(route: &RouteConfig) -> String {
    let local = match route.get_local() {
        LocalMode::Static(local) => format!("{} => {}", local.get_url_prefix(), local.get_root_directory().display()),
        LocalMode::Proxy(target) => target.to_string(),
    };
    let mut line = format!(
        "\x1b[1;33m:{}\x1b[0m -> \x1b[1;32m{}\x1b[0m, remote \x1b[1;36m{}\x1b[0m",
        route.get_listen_port(),
        local,
        route.get_remote()
    );
    if let Some(rule) = route.get_forward_rule() {
        line.push_str(&format!(" rule \x1b[1;35m{}\x1b[0m", rule.as_str()));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use devproxy::config::{LocalEntry, ProxyEntry};
    use std::path::Path;

    #[test]
    fn test_parse_defaults() {
        let args = DevProxyArguments::try_parse_from(["devproxy"]).unwrap();
        assert_eq!(args.dir, None);
        assert_eq!(args.config_path, None);
        assert!(!args.verbose);
        assert!(args.command.is_none());
        assert_eq!(args.effective_config_path(), Path::new(".").join("devproxy.json"));
    }

    #[test]
    fn test_parse_dir_and_config() {
        let args = DevProxyArguments::try_parse_from(["devproxy", "site", "-c", "proxy.json", "-v"]).unwrap();
        assert_eq!(args.dir, Some(PathBuf::from("site")));
        assert!(args.verbose);
        assert_eq!(args.effective_config_path(), Path::new("site").join("proxy.json"));
    }

    #[test]
    fn test_parse_subcommands() {
        let args = DevProxyArguments::try_parse_from(["devproxy", "init"]).unwrap();
        assert!(matches!(args.command, Some(DevProxyCommands::Init)));

        let args = DevProxyArguments::try_parse_from(["devproxy", "config", "show-path"]).unwrap();
        assert!(matches!(args.command, Some(DevProxyCommands::Config { command: ConfigCommands::ShowPath })));

        assert!(DevProxyArguments::try_parse_from(["devproxy", "config"]).is_err());
    }

    #[test]
    fn test_format_route() {
        let route = ConfigFile::template().entries()[0].resolve(Path::new("site")).unwrap();
        let line = format_route(&route);
        assert!(line.contains(":1990"));
        assert!(line.contains("/ => "));
        assert!(line.contains("https://www.example.com"));
        assert!(line.contains("^/api/"));
    }

    #[test]
    fn test_format_proxy_route() {
        let entry = ProxyEntry::new(None, "https://www.example.com", LocalEntry::Proxy("http://localhost:8080/php".to_string()), 1991);
        let line = format_route(&entry.resolve(Path::new(".")).unwrap());
        assert!(line.contains("http://localhost:8080/php"));
        assert!(!line.contains("rule"));
    }
}
