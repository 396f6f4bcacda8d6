use std::collections::HashSet;
use std::path::Path;

use barrier_core::{BarrierAction, BarrierService, Event};
use clap::Args;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

use super::output::{accepted_id, print_event, print_snapshot};
use super::{load_config, runtime, seeded_controller};

#[derive(Args)]
pub struct SimulateArgs {
    /// Actions to request, in order (open, close)
    #[arg(required = true)]
    actions: Vec<BarrierAction>,
    /// Send every request immediately instead of waiting for each transition
    #[arg(long)]
    no_wait: bool,
    #[arg(long)]
    json: bool,
}

pub fn run_single(
    config_path: Option<&Path>,
    action: BarrierAction,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    run(
        config_path,
        SimulateArgs {
            actions: vec![action],
            no_wait: false,
            json,
        },
    )
}

pub fn run(config_path: Option<&Path>, args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let controller = seeded_controller(&config);

    runtime()?.block_on(async {
        let service = BarrierService::spawn(controller);
        let handle = service.handle();
        let mut events = handle.subscribe();
        let mut awaiting = HashSet::new();

        for action in &args.actions {
            let outcome = handle.request(*action).await?;
            if let Some(id) = accepted_id(&outcome) {
                awaiting.insert(id);
            }
            if !args.no_wait {
                drain(&mut events, &mut awaiting, args.json).await?;
            }
        }
        drain(&mut events, &mut awaiting, args.json).await?;

        let snapshot = handle.snapshot().await?;
        print_snapshot(&snapshot, &config, args.json)?;

        handle.shutdown().await?;
        drop(handle);
        service.join().await?;
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

/// Print events until every awaited transition has completed, then flush
/// whatever is already queued.
async fn drain(
    events: &mut broadcast::Receiver<Event>,
    awaiting: &mut HashSet<u64>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    while !awaiting.is_empty() {
        match events.recv().await {
            Ok(event) => {
                if let Event::TransitionCompleted { transition_id, .. } = &event {
                    awaiting.remove(transition_id);
                }
                print_event(&event, json)?;
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "event subscriber lagged");
            }
            Err(RecvError::Closed) => return Ok(()),
        }
    }
    loop {
        match events.try_recv() {
            Ok(event) => print_event(&event, json)?,
            Err(TryRecvError::Lagged(_)) => continue,
            Err(TryRecvError::Empty | TryRecvError::Closed) => return Ok(()),
        }
    }
}
