mod deploy;

pub use deploy::{DeployArgs, deploy};
