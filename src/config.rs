use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub frontend_url: String,

    pub jwt_secret: String,
    pub jwt_ttl_secs: i64,

    pub gemini_api_key: String,
    pub gemini_model: String,

    pub overpass_url: String,
    pub nominatim_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "5000".into())
                .parse()
                .expect("PORT must be a number"),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5500".into()),

            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            // Tokens live for 7 days
            jwt_ttl_secs: env::var("JWT_TTL_SECS")
                .unwrap_or_else(|_| "604800".into())
                .parse()
                .expect("JWT_TTL_SECS must be a number"),

            gemini_api_key: env::var("GEMINI_API_KEY").unwrap_or_else(|_| String::new()),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-2.0-flash".into()),

            overpass_url: env::var("OVERPASS_URL")
                .unwrap_or_else(|_| "https://overpass.kumi.systems/api/interpreter".into()),
            nominatim_url: env::var("NOMINATIM_URL")
                .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".into()),
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
