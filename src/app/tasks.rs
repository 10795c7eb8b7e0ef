use tokio::task::JoinHandle;

use super::events::AppEvent;
use super::proxy::EventProxy;
use super::state::AppState;

use crate::core::{CoreError, TreeBuilder};

/// Starts a walk of `state.current_dir` on a blocking worker.
///
/// Returns `None` without doing anything if a walk is already in flight;
/// there is no queueing and no cancellation. Otherwise the current tree and
/// selection are dropped, and the returned task posts an `AppEvent` through
/// `proxy` when the walk finishes.
pub fn start_walk<P: EventProxy>(state: &mut AppState, proxy: P) -> Option<JoinHandle<()>> {
    if state.is_walking {
        tracing::info!("Walk already in progress, ignoring refresh request.");
        return None;
    }

    state.is_walking = true;
    state.reset_tree_state();
    state.status = "Loading directory structure...".to_string();

    let root = state.current_dir.clone();
    let builder = TreeBuilder::from_patterns(&state.config.ignored_patterns);

    tracing::debug!("Spawning walk task for {}", root.display());
    let handle = tokio::spawn(async move {
        let walk_root = root.clone();
        let result = tokio::task::spawn_blocking(move || builder.build(&walk_root))
            .await
            .map_err(CoreError::from);

        match result {
            Ok(tree) => proxy.send_event(AppEvent::WalkCompleted { root, tree }),
            Err(e) => {
                tracing::error!("Walk of {} failed: {}", root.display(), e);
                proxy.send_event(AppEvent::WalkFailed {
                    root,
                    error: e.to_string(),
                });
            }
        }
    });

    Some(handle)
}

/// Applies one event from the background walk to the foreground state.
pub fn handle_event(state: &mut AppState, event: AppEvent) {
    match event {
        AppEvent::WalkCompleted { root, tree } => {
            tracing::info!("Installing tree for {} ({} nodes)", root.display(), tree.len());
            state.install_tree(tree);
            state.is_walking = false;
            state.status = format!("Loaded directory: {}", root.display());
        }
        AppEvent::WalkFailed { root, error } => {
            state.is_walking = false;
            state.status = format!("Error loading directory {}: {}", root.display(), error);
        }
    }
}
