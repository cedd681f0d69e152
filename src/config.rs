use clap::{ArgAction, Parser};

pub const DEFAULT_PROMPT: &str = "i forget how to prompt";
pub const DEFAULT_MODEL: &str = "llama3.1";

// CLI argument structure
#[derive(Parser, Debug, Clone)]
#[command(name = "redlama")]
#[command(about = "Prompt a local Ollama model, caching responses in Redis")]
pub struct Args {
    // Text prompt for the model
    #[arg(short, long, default_value = DEFAULT_PROMPT)]
    pub prompt: String,

    // Model name served by Ollama
    #[arg(short, long, default_value = DEFAULT_MODEL)]
    pub model: String,

    // Use cached response, set to false to prompt ollama again and overwrite it
    #[arg(short, long, default_value_t = true, action = ArgAction::Set)]
    pub cache: bool,

    // Ollama server base url
    #[arg(long, default_value = "http://localhost:11434")]
    pub ollama_url: String,

    #[arg(long, default_value = "localhost")]
    pub redis_host: String,

    #[arg(long, default_value_t = 6379)]
    pub redis_port: u16,

    // Redis logical database [0-15]
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(0..=15))]
    pub redis_db: u8,

    // Log filter, RUST_LOG takes precedence
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    // Print prometheus counters to stderr after the run
    #[arg(long)]
    pub metrics: bool,
}

impl Args {
    pub fn is_default_prompt(&self) -> bool {
        self.prompt == DEFAULT_PROMPT
    }

    pub fn config(&self) -> Config {
        Config {
            backend: BackendConfig {
                base_url: self.ollama_url.trim_end_matches('/').to_string(),
            },
            redis: RedisConfig {
                host: self.redis_host.clone(),
                port: self.redis_port,
                db: self.redis_db,
            },
        }
    }
}

/// Addresses of everything the client talks to.
#[derive(Debug, Clone)]
pub struct Config {
    pub backend: BackendConfig,
    pub redis: RedisConfig,
}

#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: String,
}

impl BackendConfig {
    pub fn generate_url(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }
}

#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
    pub db: u8,
}

impl RedisConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    // No credentials configured
    pub fn url(&self) -> String {
        format!("redis://{}/{}", self.addr(), self.db)
    }
}
