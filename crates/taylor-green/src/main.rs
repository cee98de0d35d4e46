use log::{error, info};
use taylor_green::{TaylorGreenCase, DEFAULT_RESOLUTION};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let summary = TaylorGreenCase::new(DEFAULT_RESOLUTION).and_then(|mut case| case.run());
    match summary {
        Ok(summary) => info!(
            "finished {} cycles at Time={:.4}, kinetic energy {:.6e} vs analytic {:.6e}",
            summary.cycles, summary.physical_time, summary.kinetic_energy, summary.analytic_energy
        ),
        Err(err) => {
            error!("{}", err);
            std::process::exit(1);
        }
    }
}
