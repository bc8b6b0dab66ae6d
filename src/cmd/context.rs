use std::sync::Arc;

use anyhow::{bail, Result};
use log::debug;

use singalong::auth::{AuthContext, Navigator, View};
use singalong::client::config::ClientConfig;
use singalong::client::factory::ClientFactory;
use singalong::client::karaoke::KaraokeApi;
use singalong::config::{CommonConfig, PathSet};
use singalong::logs::config::LogConfig;
use singalong::logs::init_logger;
use singalong::prefs::Preferences;
use singalong::session::SessionStore;
use singalong::storage::{FileStore, Storage};

use super::GlobalArgs;

/// Everything a command needs, built once per invocation.
pub struct AppContext {
    pub client_config: ClientConfig,
    pub log_config: LogConfig,
    pub api: KaraokeApi,
    pub auth: AuthContext,
    pub prefs: Preferences,
}

impl AppContext {
    pub fn build(args: &GlobalArgs) -> Result<Self> {
        let paths = PathSet::new(args.config_path.clone(), args.data_path.clone())?;

        let log_config = paths.load_config("log", LogConfig::default)?;
        init_logger(&log_config, args.verbose)?;

        let client_factory = ClientFactory::load(&paths)?;
        let api = client_factory.build_api()?;
        let client_config = client_factory.config().clone();

        let storage = Storage::new(FileStore::new(paths.storage_path())?);
        let auth = AuthContext::new(SessionStore::new(storage.clone()), Arc::new(CliNavigator));
        auth.initialize();
        debug!("Use server '{}'", api.client().url());

        Ok(Self {
            client_config,
            log_config,
            api,
            auth,
            prefs: Preferences::new(storage),
        })
    }

    /// Token of the current session, or an error asking the user to log in.
    pub fn require_token(&self) -> Result<String> {
        match self.auth.token() {
            Some(token) => Ok(token),
            None => bail!("you are not logged in, run `singalong login` first"),
        }
    }
}

pub struct CliNavigator;

impl Navigator for CliNavigator {
    fn navigate(&self, view: View) {
        match view {
            View::Landing => println!("Try `singalong search <words>` to find your song"),
            View::Login => println!("Run `singalong login` to sign in"),
        }
    }
}
