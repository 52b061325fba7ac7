use crate::common::*;

use crate::model::configs::{rdb_config::*, system_config::*, zendesk_config::*};

use crate::utils_modules::io_utils::*;

use crate::env_configuration::env_config::*;

static TOTAL_CONFIG: once_lazy<TotalConfig> = once_lazy::new(initialize_server_config);

#[doc = "Function to initialize Server configuration information instances"]
pub fn initialize_server_config() -> TotalConfig {
    info!("initialize_server_config() START!");
    TotalConfig::new()
}

#[derive(Debug, Deserialize, Getters)]
#[getset(get = "pub")]
pub struct TotalConfig {
    pub sqlserver: RdbConfig,
    pub zendesk: ZendeskConfig,
    pub system: SystemConfig,
}

#[doc = "SQL Server 설정 정보"]
pub fn get_rdb_config_info() -> &'static RdbConfig {
    &TOTAL_CONFIG.sqlserver
}

#[doc = "Zendesk config 정보"]
pub fn get_zendesk_config_info() -> &'static ZendeskConfig {
    &TOTAL_CONFIG.zendesk
}

#[doc = "system 설정 정보"]
pub fn get_system_config_info() -> &'static SystemConfig {
    &TOTAL_CONFIG.system
}

impl TotalConfig {
    fn new() -> Self {
        match read_toml_from_file::<TotalConfig>(&SERVER_CONFIG_PATH) {
            Ok(config) => config,
            Err(e) => {
                let err_msg = "Failed to convert the data from SERVER_CONFIG_PATH into the TotalConfig structure.";
                error!("[TotalConfig->new] {} {:?}", err_msg, e);
                std::process::exit(1);
            }
        }
    }
}
