//! Identity-based deduplication of user types.
//!
//! Symbol backends report the same native type under several ids (once per
//! compilation unit that uses it). Records sharing namespace, name and
//! template argument signature collapse onto the first one seen.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use symgen_core::utils::{split_qualified, strip_template_arguments};

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::type_tree::{TypeId, TypeRegistry, TypeTree, UserState};

/// (namespace, name, template signature) of an aggregate, in native spelling.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct IdentityKey {
    pub namespace: Option<String>,
    pub name: String,
    /// Natively spelled template arguments; empty for plain user types.
    pub arguments: Vec<String>,
}

pub(crate) fn identity_key(registry: &TypeRegistry, id: TypeId) -> Option<IdentityKey> {
    let (layout, arguments) = match registry.get(id) {
        TypeTree::User(user) => (user, Vec::new()),
        TypeTree::Template(inst) => {
            let arguments = inst
                .arguments
                .iter()
                .map(|&arg| registry.native_spelling(arg))
                .collect();
            (registry.user(inst.template)?, arguments)
        }
        _ => return None,
    };

    let (namespace, last) = split_qualified(registry.name(layout.native_name));
    let name = if layout.is_template {
        strip_template_arguments(last)
    } else {
        last
    };
    Some(IdentityKey {
        namespace: namespace.map(str::to_owned),
        name: name.to_owned(),
        arguments,
    })
}

/// Collapse duplicates among `aggregates`, keeping first occurrences.
///
/// Every link and symbol binding to a duplicate is redirected to the kept
/// node. Kept layouts move to `Kept`, dropped ones to `Discarded`.
pub(crate) fn deduplicate(
    registry: &mut TypeRegistry,
    aggregates: &mut Vec<TypeId>,
    diagnostics: &mut Diagnostics,
) {
    let mut canonical: HashMap<IdentityKey, TypeId> = HashMap::new();
    let mut forward: HashMap<TypeId, TypeId> = HashMap::new();
    let mut kept = Vec::with_capacity(aggregates.len());

    for &id in aggregates.iter() {
        let Some(key) = identity_key(registry, id) else {
            continue;
        };
        let first = match canonical.entry(key) {
            Entry::Vacant(entry) => {
                entry.insert(id);
                kept.push(id);
                continue;
            }
            Entry::Occupied(entry) => *entry.get(),
        };

        forward.insert(id, first);
        let (Some(dup_layout), Some(first_layout)) =
            (registry.layout_of(id), registry.layout_of(first))
        else {
            continue;
        };
        if dup_layout != id {
            forward.insert(dup_layout, first_layout);
        }

        let first_user = registry.user(first_layout).map(|u| (u.size, u.native_name));
        if let (Some(dup), Some((first_size, native))) = (registry.user(dup_layout), first_user)
            && dup.size != first_size
        {
            let message = format!(
                "`{}` is defined with size {} and {}; keeping the first definition",
                registry.name(native),
                first_size,
                dup.size
            );
            let symbol = dup.symbol;
            diagnostics.report(DiagnosticKind::ConflictingDuplicate, Some(symbol), message);
        }

        if let Some(dup) = registry.user_mut(dup_layout) {
            dup.state.advance(UserState::Discarded { into: first_layout });
            tracing::trace!(symbol = %dup.symbol, into = first_layout.0, "discarded duplicate");
        }
    }

    for &id in &kept {
        if let Some(layout) = registry.layout_of(id)
            && let Some(user) = registry.user_mut(layout)
        {
            user.state.advance(UserState::Kept);
        }
    }

    registry.redirect(&forward);
    tracing::debug!(
        kept = kept.len(),
        discarded = aggregates.len() - kept.len(),
        "deduplicated aggregates"
    );
    *aggregates = kept;
}
