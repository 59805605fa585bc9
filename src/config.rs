use std::env;
use dotenvy::dotenv;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub server_addr: String,

    // Civil timezone for all cutoff comparisons (hours east of UTC)
    pub tz_offset_hours: i32,
    // "HH:MM:SS" — arriving at/after this time is telat
    pub check_in_deadline: String,
    // "HH:MM:SS" — check-out and reconciliation open at this time
    pub check_out_earliest: String,

    pub api_prefix: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),

            tz_offset_hours: env::var("TZ_OFFSET_HOURS")
                .unwrap_or_else(|_| "7".to_string()) // default Asia/Jakarta
                .parse()
                .expect("TZ_OFFSET_HOURS must be an integer"),
            check_in_deadline: env::var("CHECK_IN_DEADLINE")
                .unwrap_or_else(|_| "07:00:00".to_string()),
            check_out_earliest: env::var("CHECK_OUT_EARLIEST")
                .unwrap_or_else(|_| "15:00:00".to_string()),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
        }
    }
}
