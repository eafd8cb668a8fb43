pub const SOCKET_PATH: &str = "/run/appstated.sock";
pub const CONFIG_DIR: &str = "/etc/appstated";
pub const CONFIG_DIR_ENV: &str = "APPSTATED_CONFIG_DIR";
