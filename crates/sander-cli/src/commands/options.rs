use crate::cli::OptionsArgs;
use crate::config::Preset;
use crate::error::Result;
use sander::core::options::{InputOptions, QmInputOptions};
use sander::engine::backend::Backend;
use sander::engine::session::Sander;
use serde::Serialize;
use tracing::info;

#[derive(Serialize)]
struct OptionsDocument {
    mm: InputOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    qm: Option<QmInputOptions>,
}

pub fn run<B: Backend>(args: OptionsArgs, sander: &Sander<B>) -> Result<()> {
    info!("Rendering {:?} option preset.", args.preset);
    print!("{}", render(&args, sander)?);
    Ok(())
}

/// Renders the requested presets as a document that `[mm]`/`[qm]` config sections accept.
fn render<B: Backend>(args: &OptionsArgs, sander: &Sander<B>) -> Result<String> {
    let mm = match args.preset {
        Preset::Gas => sander.gas_input(args.igb),
        Preset::Pme => sander.pme_input(),
    };
    let qm = args.qm.then(|| sander.qm_input());
    Ok(toml::to_string(&OptionsDocument { mm, qm })?)
}
