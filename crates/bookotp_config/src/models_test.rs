#[cfg(test)]
mod tests {
    use crate::{AppConfig, ConfigLoadError, TwilioChannel};
    use serde_json::json;

    fn minimal() -> serde_json::Value {
        json!({ "server": { "host": "127.0.0.1", "port": 8080 } })
    }

    #[test]
    fn test_defaults_fill_optional_sections() {
        let config: AppConfig = serde_json::from_value(minimal()).unwrap();

        assert!(!config.use_twilio);
        assert!(!config.use_sheets);
        assert_eq!(config.otp.ttl_seconds, 300);
        assert_eq!(config.otp.sweep_interval_seconds, 60);
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.logging.level, "info");
        assert!(config.messages.otp_template.contains("{code}"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_twilio_section_parses_channel() {
        let mut value = minimal();
        value["twilio"] = json!({
            "account_sid": "AC123",
            "auth_token": "tok",
            "from_number": "+15550001111",
            "channel": "whatsapp"
        });
        let config: AppConfig = serde_json::from_value(value).unwrap();
        let twilio = config.twilio.unwrap();

        assert_eq!(twilio.channel, TwilioChannel::Whatsapp);
        assert_eq!(twilio.api_base_url, "https://api.twilio.com");
    }

    #[test]
    fn test_enabled_integration_requires_section() {
        let mut value = minimal();
        value["use_twilio"] = json!(true);
        value["use_sheets"] = json!(true);
        let config: AppConfig = serde_json::from_value(value).unwrap();

        match config.validate() {
            Err(ConfigLoadError::Invalid(problems)) => {
                assert_eq!(problems.len(), 2);
                assert!(problems[0].contains("twilio"));
                assert!(problems[1].contains("sheets"));
            }
            other => panic!("expected invalid configuration, got {other:?}"),
        }
    }

    #[test]
    fn test_unreplaced_secret_marker_is_rejected() {
        let mut value = minimal();
        value["use_twilio"] = json!(true);
        value["twilio"] = json!({
            "account_sid": "AC123",
            "auth_token": "secret_from_env",
            "from_number": "+15550001111"
        });
        let config: AppConfig = serde_json::from_value(value).unwrap();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("twilio.auth_token"));
    }

    #[test]
    fn test_otp_template_must_carry_code_placeholder() {
        let mut value = minimal();
        value["messages"] = json!({ "otp_template": "Welcome!" });
        let config: AppConfig = serde_json::from_value(value).unwrap();

        assert!(config.validate().is_err());
    }
}
