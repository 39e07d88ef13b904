use std::env;

use anyhow::{Result, anyhow, bail};
use comms::RequestKind;
use orchestrator::{
    ConfigStore, HttpTransport, Outcome, Phase, Session,
    configs::{datasets, json},
    state::TrainingResult,
};

mod cli;

use cli::Args;

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse(env::args().skip(1))?;
    let (mut session, mut transport) = orchestrator::connect()?;
    let mut store = ConfigStore::new();

    store.set_dataset(args.dataset);
    step(&mut session, RequestKind::Import, &mut store, &mut transport)?;
    log::info!(
        "{} row(s) imported from {}",
        store.common().rows.len(),
        args.dataset
    );

    let target = args
        .target
        .as_deref()
        .unwrap_or_else(|| datasets::default_target(args.dataset));
    store.set_target(target)?;
    step(&mut session, RequestKind::Preprocess, &mut store, &mut transport)?;

    if let Some(path) = &args.preset {
        let model = json::load_preset(path, *store.model()).map_err(|e| anyhow!(e))?;
        store.set_model(model);
    }
    if let Some(kind) = args.model {
        store.set_model_kind(kind);
    }

    if args.optimize {
        step(&mut session, RequestKind::Optimize, &mut store, &mut transport)?;
    }
    step(&mut session, RequestKind::Train, &mut store, &mut transport)?;

    let training = store
        .results()
        .training
        .as_ref()
        .ok_or_else(|| anyhow!("training finished without a result"))?;
    report(&store, training);
    Ok(())
}

/// Runs one request to completion, confirming the optimize prompt.
fn step(
    session: &mut Session,
    kind: RequestKind,
    store: &mut ConfigStore,
    transport: &mut HttpTransport,
) -> Result<()> {
    let phase = match session.execute(kind, store, transport)? {
        Outcome::Finished(phase) => phase,
        Outcome::AwaitingConfirmation => session.execute_confirmed(store, transport)?,
    };

    if let Phase::Error(kind, tag) = phase {
        let detail = session
            .last_error()
            .map(ToString::to_string)
            .unwrap_or_default();
        bail!("{kind} failed ({tag:?}): {detail}");
    }
    Ok(())
}

fn report(store: &ConfigStore, training: &TrainingResult) {
    let common = store.common();
    println!(
        "dataset: {}, target: {}",
        common.dataset,
        common.target.as_deref().unwrap_or("-")
    );
    println!("model: {}", training.model);
    println!("output layer: {}", common.problem.output_layer());

    if let Some(loss) = training.best_val_loss() {
        println!("best validation loss: {loss}");
    }
    let validation = training.validation_report();
    if !validation.is_empty() {
        println!("validation: {validation}");
    }
    println!("test: {}", training.test_report());
    println!("predictions: {}", training.pairs().count());
}
