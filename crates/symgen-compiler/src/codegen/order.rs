//! Declaration order over the base-class relation.

use std::collections::{BTreeSet, HashMap};

use super::Emitter;
use super::emitter::Unit;
use crate::Error;

impl Emitter<'_> {
    /// Units with every base before its derivatives, ties in record order.
    ///
    /// Kahn's algorithm. Field references impose no order, so only base
    /// classes can form a cycle, which fails the whole emission.
    pub(super) fn sort_topologically(&self) -> Result<Vec<usize>, Error> {
        let count = self.units.len();
        let mut deps: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); count];
        let mut rdeps: HashMap<usize, Vec<usize>> = HashMap::new();

        for (unit, &kind) in self.units.iter().enumerate() {
            for base in self.unit_bases(kind) {
                let Some(&base_unit) = self.unit_of.get(&base) else {
                    continue;
                };
                // A generic template deriving from another of its own instantiations.
                if base_unit == unit && matches!(kind, Unit::Generic(_)) {
                    continue;
                }
                if deps[unit].insert(base_unit) {
                    rdeps.entry(base_unit).or_default().push(unit);
                }
            }
        }

        let mut ready: BTreeSet<usize> = (0..count).filter(|&u| deps[u].is_empty()).collect();
        let mut result = Vec::with_capacity(count);
        while let Some(unit) = ready.pop_first() {
            result.push(unit);
            for &dependent in rdeps.get(&unit).into_iter().flatten() {
                deps[dependent].remove(&unit);
                if deps[dependent].is_empty() {
                    ready.insert(dependent);
                }
            }
        }

        if result.len() < count {
            return Err(Error::CyclicInheritance {
                cycle: self.find_cycle(&deps),
            });
        }
        Ok(result)
    }

    /// Walk unresolved dependencies from the first stuck unit until one repeats.
    fn find_cycle(&self, deps: &[BTreeSet<usize>]) -> Vec<String> {
        let Some(start) = (0..deps.len()).find(|&u| !deps[u].is_empty()) else {
            return Vec::new();
        };

        let mut path = vec![start];
        let mut current = start;
        loop {
            let Some(&next) = deps[current].iter().find(|&&d| !deps[d].is_empty()) else {
                break;
            };
            if let Some(pos) = path.iter().position(|&u| u == next) {
                let mut cycle: Vec<String> = path[pos..]
                    .iter()
                    .map(|&u| self.unit_names[u].path.clone())
                    .collect();
                cycle.push(self.unit_names[next].path.clone());
                return cycle;
            }
            path.push(next);
            current = next;
        }

        path.iter()
            .map(|&u| self.unit_names[u].path.clone())
            .collect()
    }
}
