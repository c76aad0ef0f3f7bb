// Logging Tests
//
// Tests for the logging module.

#[cfg(test)]
mod tests {
    use crate::logging::*;

    mod log_level_tests {
        use super::*;

        #[test]
        fn should_have_correct_ordering() {
            assert!((LogLevel::Debug as u8) < (LogLevel::Info as u8));
            assert!((LogLevel::Info as u8) < (LogLevel::Warn as u8));
            assert!((LogLevel::Warn as u8) < (LogLevel::Error as u8));
        }

        #[test]
        fn should_deserialize_lowercase_names() {
            let level: LogLevel = serde_json::from_str("\"warn\"").unwrap();
            assert_eq!(level, LogLevel::Warn);
            assert_eq!(LogLevel::default(), LogLevel::Info);
        }
    }

    mod console_logger_tests {
        use super::*;

        #[test]
        fn should_check_level_enabled() {
            let logger = ConsoleLogger::new(LogLevel::Warn);

            assert_eq!(logger.level(), LogLevel::Warn);
            assert!(!logger.is_enabled(LogLevel::Debug));
            assert!(!logger.is_enabled(LogLevel::Info));
            assert!(logger.is_enabled(LogLevel::Warn));
            assert!(logger.is_enabled(LogLevel::Error));
        }

        #[test]
        fn should_tag_every_line_of_a_message() {
            let logger = ConsoleLogger::with_prefix(LogLevel::Info, "dm-annotate");
            assert_eq!(
                logger.format(LogLevel::Info, "Parsed annotation for class com.acme.Foo\n\tComponent"),
                "dm-annotate [INFO] Parsed annotation for class com.acme.Foo\ndm-annotate [INFO] \tComponent"
            );
            assert_eq!(
                ConsoleLogger::new(LogLevel::Debug).format(LogLevel::Warn, "careful"),
                "[WARN] careful"
            );
        }
    }

    mod capturing_logger_tests {
        use super::*;

        #[test]
        fn should_drop_messages_below_level() {
            let logger = CapturingLogger::new(LogLevel::Info);
            logger.debug("hidden");
            logger.info("shown");
            logger.warn("careful");

            assert_eq!(
                logger.records(),
                vec![
                    (LogLevel::Info, "shown".to_string()),
                    (LogLevel::Warn, "careful".to_string()),
                ]
            );
            assert_eq!(logger.messages(LogLevel::Warn), vec!["careful".to_string()]);
        }
    }

    mod null_logger_tests {
        use super::*;

        #[test]
        fn should_not_log_anything() {
            let logger = NullLogger::new();

            logger.debug("debug message");
            logger.info("info message");
            logger.warn("warn message");
            logger.error("error message");
            assert!(!logger.is_enabled(LogLevel::Warn));
        }
    }
}
