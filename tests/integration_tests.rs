//! Integration tests for the zhv library.
//! These tests require an API key in the environment to run.

#[cfg(test)]
mod tests {
    use zhv::{Config, Converter, NamingStyle};

    fn live_config() -> Option<Config> {
        let config = Config::load();
        if !config.is_valid() {
            eprintln!("Skipping test: ZHV_API_URL/ZHV_MODEL/ZHV_KEY not set");
            return None;
        }
        Some(config)
    }

    #[tokio::test]
    async fn test_buffered_conversion() {
        let Some(config) = live_config() else {
            return;
        };

        let converter = Converter::new(config).expect("Failed to create converter");
        let results = converter.convert("用户名称", NamingStyle::Camel).await;

        assert!(
            results.is_ok(),
            "Conversion should succeed with valid config"
        );
        assert!(
            !results.unwrap().is_empty(),
            "Conversion should produce at least one candidate"
        );
    }

    #[tokio::test]
    async fn test_streaming_conversion() {
        let Some(config) = live_config() else {
            return;
        };

        let converter = Converter::new(config).expect("Failed to create converter");
        let mut streamed = String::new();
        let mut finished = Vec::new();

        let outcome = converter
            .convert_stream(
                "数据库连接",
                NamingStyle::Snake,
                |content| streamed.push_str(content),
                |results| finished = results,
            )
            .await;

        assert!(outcome.is_ok(), "Stream request should succeed");
        assert!(!streamed.is_empty(), "Stream should produce content");
        assert!(
            !finished.is_empty(),
            "Stream completion should produce candidates"
        );
    }
}
