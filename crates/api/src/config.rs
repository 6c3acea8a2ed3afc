/// Server configuration loaded from environment variables.
///
/// All fields except the API keys have sensible defaults suitable for
/// local development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `180`).
    ///
    /// The default is generous because a wizard generate call fans out to
    /// image generation requests that can take up to two minutes each.
    pub request_timeout_secs: u64,
    /// Base URL of the cloud function endpoint set.
    pub cloud_function_base_url: String,
    /// OpenAI-compatible chat endpoint (vision + text models).
    pub chat_base_url: String,
    pub chat_api_key: String,
    /// Image generation endpoint.
    pub image_base_url: String,
    pub image_api_key: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                                              |
    /// |---------------------------|------------------------------------------------------|
    /// | `HOST`                    | `0.0.0.0`                                            |
    /// | `PORT`                    | `3000`                                               |
    /// | `CORS_ORIGINS`            | `http://localhost:5173`                              |
    /// | `REQUEST_TIMEOUT_SECS`    | `180`                                                |
    /// | `CLOUD_FUNCTION_BASE_URL` | (required)                                           |
    /// | `DASHSCOPE_BASE_URL`      | `https://dashscope.aliyuncs.com/compatible-mode/v1`  |
    /// | `DASHSCOPE_API_KEY`       | (required)                                           |
    /// | `ARK_BASE_URL`            | `https://ark.cn-beijing.volces.com/api/v3`           |
    /// | `ARK_API_KEY`             | (required)                                           |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "180".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let cloud_function_base_url = std::env::var("CLOUD_FUNCTION_BASE_URL")
            .expect("CLOUD_FUNCTION_BASE_URL must be set");

        let chat_base_url = std::env::var("DASHSCOPE_BASE_URL")
            .unwrap_or_else(|_| "https://dashscope.aliyuncs.com/compatible-mode/v1".into());
        let chat_api_key =
            std::env::var("DASHSCOPE_API_KEY").expect("DASHSCOPE_API_KEY must be set");

        let image_base_url = std::env::var("ARK_BASE_URL")
            .unwrap_or_else(|_| "https://ark.cn-beijing.volces.com/api/v3".into());
        let image_api_key = std::env::var("ARK_API_KEY").expect("ARK_API_KEY must be set");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            cloud_function_base_url,
            chat_base_url,
            chat_api_key,
            image_base_url,
            image_api_key,
        }
    }
}
