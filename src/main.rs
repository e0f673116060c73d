use anyhow::Result;
use log::*;

use engine::vulkan::ContextConfig;
use engine::Engine;

fn main() -> Result<()> {
    pretty_env_logger::init();

    let engine = match Engine::new(ContextConfig::default()) {
        Err(err) => {
            error!("{:#}", err);
            return Err(err);
        }
        Ok(e) => e,
    };

    info!("Running on `{}`.", engine.context().device_name());
    engine.run()
}
