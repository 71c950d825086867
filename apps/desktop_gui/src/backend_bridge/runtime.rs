//! Backend worker thread: owns the tokio runtime the orchestrator spawns requests onto.

use std::{sync::Arc, thread};

use client_core::Orchestrator;
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(
    orchestrator: Arc<Orchestrator>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::startup(format!(
                    "backend worker startup failure: failed to build runtime: {err}"
                ))));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::Trigger { operation, url } => {
                        // Rejections are already recorded in dashboard state.
                        if let Err(err) = orchestrator.trigger(operation, &url) {
                            tracing::debug!(
                                operation = operation.as_str(),
                                error = %err,
                                "trigger rejected"
                            );
                        }
                    }
                    BackendCommand::ListBrands => {
                        let api = Arc::clone(orchestrator.api());
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            let event = match api.list_brands().await {
                                Ok(brands) => UiEvent::BrandsLoaded(brands),
                                Err(err) => UiEvent::Error(UiError::from_operation(
                                    UiErrorContext::Brands,
                                    &err,
                                )),
                            };
                            let _ = ui_tx.try_send(event);
                        });
                    }
                }
            }
            tracing::info!("ui command channel closed, backend worker exiting");
        });
    });
}
