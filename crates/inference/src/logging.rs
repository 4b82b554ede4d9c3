use crate::config::PoseConfig;

pub fn setup_logging(config: &PoseConfig) {
    common::setup_logging(config.environment.clone());
}
