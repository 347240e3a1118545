use std::error::Error;
use std::io::Write;
use std::process::ExitCode;

use log::{error, warn};
use precision_cg::config::{RunOptions, USAGE};
use precision_cg::context::Problem;
use precision_cg::io::{export_convergence, write_report};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opts = match RunOptions::from_args(std::env::args().skip(1)) {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
    };
    match run(&opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(opts: &RunOptions) -> Result<(), Box<dyn Error>> {
    let problem = Problem::load(&opts.matrix, opts.name.as_str())?;
    let stdout = std::io::stdout();

    for &kind in &opts.precisions {
        let run = problem.run(kind, &opts.solver)?;
        let mut out = stdout.lock();
        writeln!(out, "[{kind}]")?;
        write_report(&mut out, &run.result, &problem.name)?;
        drop(out);

        if let Some(dir) = &opts.export_dir {
            let path = dir.join(format!("{}_{}.json", problem.name, kind.label()));
            // export failures are logged by the exporter; the other precisions still run
            if export_convergence(&run.result, &path, &problem.name, kind).is_err() {
                warn!("skipping export for {kind}");
            }
        }
    }
    Ok(())
}
