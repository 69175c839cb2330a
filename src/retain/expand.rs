//! Root expansion
//!
//! Toyota Way Principles:
//! - Poka-Yoke: every root is kind-checked before any node is touched
//!
//! Expansion is a single pass over the user's roots. Each frame root pins
//! its Vecs; each model root pins its training and validation frames (and
//! their Vecs), its metrics and its cross-validation children. Keys found
//! along the way are not expanded again, except in
//! [`ExpansionMode::Recursive`].

use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use crate::config::ExpansionMode;
use crate::key::Key;
use crate::kv::{resolve, KvStore};
use crate::object::{Frame, Model};
use crate::retention::RetentionSet;
use crate::value::Value;
use crate::{Error, Result};

/// Expand `roots` into the set of keys they pin.
///
/// Unresolved and tombstoned roots are ignored. The store is only read.
///
/// # Errors
///
/// Returns [`Error::InvalidRetentionKind`] for the first root that
/// resolves to neither a frame nor a model.
pub async fn expand_roots<S: KvStore>(
    store: &S,
    roots: &[Key],
    mode: ExpansionMode,
) -> Result<RetentionSet> {
    let mut retained = RetentionSet::new();
    let mut cv_children = Vec::new();

    for root in roots {
        retained.insert(root.clone());

        let Some(value) = resolve(store, root).await? else {
            warn!(key = %root, "retention root does not resolve, ignoring");
            continue;
        };
        match value {
            Value::Frame(frame) => extract_frame_keys(&mut retained, &frame),
            Value::Model(model) => {
                let children = extract_model_keys(store, &mut retained, &model).await?;
                cv_children.extend(children);
            }
            other => {
                return Err(Error::InvalidRetentionKind {
                    key: root.clone(),
                    kind: other.kind(),
                })
            }
        }
    }

    if mode == ExpansionMode::Recursive {
        expand_cv_children(store, &mut retained, roots, cv_children).await?;
    }

    debug!(
        roots = roots.len(),
        retained = retained.len(),
        ?mode,
        "expanded retention roots"
    );
    Ok(retained)
}

/// Pin every Vec of `frame`. Chunks are pinned through their Vec.
fn extract_frame_keys(retained: &mut RetentionSet, frame: &Frame) {
    retained.extend(frame.keys().iter().cloned());
}

/// Pin what `model` references and owns.
///
/// Returns the cross-validation children, which are pinned but not expanded.
async fn extract_model_keys<S: KvStore>(
    store: &S,
    retained: &mut RetentionSet,
    model: &Model,
) -> Result<Vec<Key>> {
    let params = model.params();
    for frame_key in [&params.train, &params.valid].into_iter().flatten() {
        retained.insert(frame_key.clone());
        match resolve(store, frame_key).await? {
            Some(Value::Frame(frame)) => extract_frame_keys(retained, &frame),
            Some(other) => warn!(
                key = %frame_key,
                kind = %other.kind(),
                "model frame reference is not a frame"
            ),
            None => warn!(key = %frame_key, "model frame reference does not resolve"),
        }
    }

    let Some(output) = model.output() else {
        return Ok(Vec::new());
    };
    retained.extend(output.model_metrics.iter().cloned());
    retained.extend(output.cross_validation_models.iter().cloned());
    Ok(output.cross_validation_models.clone())
}

/// Expand cross-validation children like roots, until no new model appears.
async fn expand_cv_children<S: KvStore>(
    store: &S,
    retained: &mut RetentionSet,
    roots: &[Key],
    mut pending: Vec<Key>,
) -> Result<()> {
    let mut visited: FxHashSet<Key> = roots.iter().cloned().collect();

    while let Some(child) = pending.pop() {
        if !visited.insert(child.clone()) {
            continue;
        }
        if let Some(Value::Model(model)) = resolve(store, &child).await? {
            let grandchildren = extract_model_keys(store, retained, &model).await?;
            pending.extend(grandchildren);
        }
    }
    Ok(())
}
