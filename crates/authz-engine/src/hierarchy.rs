//! Department hierarchy index
//!
//! Walks over the per-organization department tree. Every walk is iterative,
//! carries a visited set and stops after `max_depth` hops. A walk that trips
//! either guard logs a warning and answers "no match".

use std::collections::{BTreeSet, HashSet, VecDeque};

use tracing::warn;
use uuid::Uuid;

use crate::state::StateView;

/// Result of walking a parent chain.
enum Walk {
    /// Stopped on a department matching the predicate
    Found,
    /// Reached a root (or an unknown department) without a match
    Exhausted,
    /// Tripped the depth bound or revisited a department
    Aborted,
}

/// Read-only view of the department tree of a state version.
pub struct DepartmentHierarchy<'a, V: StateView + ?Sized> {
    view: &'a V,
    max_depth: usize,
}

impl<'a, V: StateView + ?Sized> DepartmentHierarchy<'a, V> {
    /// Create a hierarchy view with the given depth guard.
    pub fn new(view: &'a V, max_depth: usize) -> Self {
        Self { view, max_depth }
    }

    /// Whether `user_id` manages `department_id` or any of its ancestors.
    ///
    /// Authority flows downward only: managing a child department gives no
    /// authority over its parent.
    pub fn is_manager_or_above(&self, department_id: Uuid, user_id: Uuid) -> bool {
        matches!(
            self.walk_up(department_id, |id| {
                self.view
                    .department(id)
                    .is_some_and(|d| d.is_managed_by(user_id))
            }),
            Walk::Found
        )
    }

    /// The department and everything below it.
    ///
    /// Returns an empty set when the root does not exist.
    pub fn all_descendants(&self, root_id: Uuid) -> BTreeSet<Uuid> {
        let mut result = BTreeSet::new();
        if self.view.department(root_id).is_none() {
            return result;
        }

        let mut queue = VecDeque::from([(root_id, 0usize)]);
        while let Some((id, depth)) = queue.pop_front() {
            if !result.insert(id) {
                warn!(department_id = %id, "department revisited during descendant walk");
                continue;
            }
            let children = self.view.child_departments(id);
            if children.is_empty() {
                continue;
            }
            if depth >= self.max_depth {
                warn!(
                    root_id = %root_id,
                    department_id = %id,
                    max_depth = self.max_depth,
                    "descendant walk hit depth guard"
                );
                continue;
            }
            queue.extend(children.into_iter().map(|child| (child, depth + 1)));
        }
        result
    }

    /// Parent chain of a department, nearest first, excluding the department.
    pub fn ancestors(&self, department_id: Uuid) -> Vec<Uuid> {
        let mut chain = Vec::new();
        self.walk_up(department_id, |id| {
            if id != department_id {
                chain.push(id);
            }
            false
        });
        chain
    }

    /// Whether making `new_parent_id` the parent of `department_id` would
    /// close a loop.
    ///
    /// True when the new parent is the department itself or lies below it.
    /// A chain that cannot be fully walked also counts as a loop.
    pub fn would_create_cycle(&self, department_id: Uuid, new_parent_id: Uuid) -> bool {
        match self.walk_up(new_parent_id, |id| id == department_id) {
            Walk::Found | Walk::Aborted => true,
            Walk::Exhausted => false,
        }
    }

    /// Number of parent hops from a department to its root.
    ///
    /// `None` for unknown departments or chains that trip a guard.
    pub fn depth(&self, department_id: Uuid) -> Option<usize> {
        self.view.department(department_id)?;
        let mut hops = 0usize;
        let walk = self.walk_up(department_id, |_| {
            hops += 1;
            false
        });
        match walk {
            Walk::Exhausted => Some(hops.saturating_sub(1)),
            _ => None,
        }
    }

    /// Number of levels below a department (0 for a leaf).
    pub fn height(&self, department_id: Uuid) -> usize {
        let mut height = 0usize;
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([(department_id, 0usize)]);
        while let Some((id, level)) = queue.pop_front() {
            if !seen.insert(id) || level > self.max_depth {
                continue;
            }
            height = height.max(level);
            queue.extend(
                self.view
                    .child_departments(id)
                    .into_iter()
                    .map(|child| (child, level + 1)),
            );
        }
        height
    }

    /// Departments of an organization managed by `user_id`.
    pub fn managed_departments(&self, organization_id: Uuid, user_id: Uuid) -> Vec<Uuid> {
        self.view
            .departments_in(organization_id)
            .into_iter()
            .filter(|d| d.is_managed_by(user_id))
            .map(|d| d.id)
            .collect()
    }

    /// Walk from `start` toward the root, testing each department.
    fn walk_up<F>(&self, start: Uuid, mut matches: F) -> Walk
    where
        F: FnMut(Uuid) -> bool,
    {
        let mut visited = HashSet::new();
        let mut current = Some(start);
        let mut hops = 0usize;

        while let Some(id) = current {
            if !visited.insert(id) {
                warn!(department_id = %id, start_id = %start, "cycle in department parent chain");
                return Walk::Aborted;
            }
            let Some(department) = self.view.department(id) else {
                return Walk::Exhausted;
            };
            if matches(id) {
                return Walk::Found;
            }
            current = department.parent_id;
            if current.is_some() {
                hops += 1;
                if hops > self.max_depth {
                    warn!(
                        start_id = %start,
                        max_depth = self.max_depth,
                        "department walk hit depth guard"
                    );
                    return Walk::Aborted;
                }
            }
        }
        Walk::Exhausted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AuthzState;
    use authz_org::Department;

    struct Tree {
        state: AuthzState,
        org: Uuid,
        root: Uuid,
        mid: Uuid,
        leaf: Uuid,
        sibling: Uuid,
    }

    /// root -> mid -> leaf, root -> sibling
    fn tree(manager: Uuid) -> Tree {
        let org = Uuid::now_v7();
        let mut state = AuthzState::new();
        let root = Department::new(org, "Root");
        let mid = Department::new(org, "Mid")
            .with_parent(root.id)
            .with_manager(manager);
        let leaf = Department::new(org, "Leaf").with_parent(mid.id);
        let sibling = Department::new(org, "Sibling").with_parent(root.id);
        let ids = (root.id, mid.id, leaf.id, sibling.id);
        for d in [root, mid, leaf, sibling] {
            state.put_department(d);
        }
        Tree {
            state,
            org,
            root: ids.0,
            mid: ids.1,
            leaf: ids.2,
            sibling: ids.3,
        }
    }

    #[test]
    fn test_authority_flows_down() {
        let manager = Uuid::now_v7();
        let t = tree(manager);
        let h = DepartmentHierarchy::new(&t.state, 32);

        assert!(h.is_manager_or_above(t.mid, manager));
        assert!(h.is_manager_or_above(t.leaf, manager));
        assert!(!h.is_manager_or_above(t.root, manager));
        assert!(!h.is_manager_or_above(t.sibling, manager));
        assert!(!h.is_manager_or_above(Uuid::now_v7(), manager));
    }

    #[test]
    fn test_all_descendants() {
        let t = tree(Uuid::now_v7());
        let h = DepartmentHierarchy::new(&t.state, 32);

        let all = h.all_descendants(t.root);
        assert_eq!(all.len(), 4);
        assert_eq!(h.all_descendants(t.mid), BTreeSet::from([t.mid, t.leaf]));
        assert_eq!(h.all_descendants(t.leaf), BTreeSet::from([t.leaf]));
        assert!(h.all_descendants(Uuid::now_v7()).is_empty());
    }

    #[test]
    fn test_ancestors_and_depth() {
        let t = tree(Uuid::now_v7());
        let h = DepartmentHierarchy::new(&t.state, 32);

        assert_eq!(h.ancestors(t.leaf), vec![t.mid, t.root]);
        assert!(h.ancestors(t.root).is_empty());
        assert_eq!(h.depth(t.root), Some(0));
        assert_eq!(h.depth(t.leaf), Some(2));
        assert_eq!(h.height(t.root), 2);
        assert_eq!(h.height(t.leaf), 0);
    }

    #[test]
    fn test_would_create_cycle() {
        let t = tree(Uuid::now_v7());
        let h = DepartmentHierarchy::new(&t.state, 32);

        assert!(h.would_create_cycle(t.mid, t.mid));
        assert!(h.would_create_cycle(t.root, t.leaf));
        assert!(!h.would_create_cycle(t.leaf, t.sibling));
    }

    #[test]
    fn test_depth_guard_fails_closed() {
        let manager = Uuid::now_v7();
        let t = tree(manager);
        let h = DepartmentHierarchy::new(&t.state, 1);

        // leaf -> mid is one hop, so the manager is still found
        assert!(h.is_manager_or_above(t.leaf, manager));
        // leaf -> mid -> root needs two hops
        assert_eq!(h.depth(t.leaf), None);
        assert!(!h.all_descendants(t.root).contains(&t.leaf));
    }

    #[test]
    fn test_corrupt_cycle_terminates() {
        let manager = Uuid::now_v7();
        let org = Uuid::now_v7();
        let mut state = AuthzState::new();
        let a = Department::new(org, "A");
        let b = Department::new(org, "B").with_parent(a.id);
        let a = a.with_parent(b.id);
        state.put_department(a.clone());
        state.put_department(b);

        let h = DepartmentHierarchy::new(&state, 32);
        assert!(!h.is_manager_or_above(a.id, manager));
        assert_eq!(h.all_descendants(a.id).len(), 2);
    }

    #[test]
    fn test_managed_departments() {
        let manager = Uuid::now_v7();
        let t = tree(manager);
        let h = DepartmentHierarchy::new(&t.state, 32);

        assert_eq!(h.managed_departments(t.org, manager), vec![t.mid]);
        assert!(h.managed_departments(Uuid::now_v7(), manager).is_empty());
    }
}
