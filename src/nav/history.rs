/// Browser-style back/forward history.
///
/// `entries` holds the locations navigated *from*. While the user sits on a
/// freshly navigated destination, that destination is not in `entries` and
/// `index` points at the location it was reached from. Taking Back from
/// there stores the destination at the end so Forward can return to it;
/// from then on the current location is `entries[index]` until the next
/// navigation.
///
/// Navigating to a new destination discards every forward entry.
#[derive(Debug, Clone)]
pub struct NavigationHistory<T> {
    entries: Vec<T>,
    /// -1 when empty.
    index: isize,
    /// Whether the current location is stored at `entries[index]`.
    on_entry: bool,
}

impl<T> Default for NavigationHistory<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: -1,
            on_entry: false,
        }
    }
}

impl<T: Clone> NavigationHistory<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that the user is leaving `from` for a new destination.
    pub fn record_visit(&mut self, from: T) {
        if self.on_entry {
            // `from` is entries[index]; drop it together with the forward branch.
            self.entries.truncate(self.index as usize);
        }
        self.entries.push(from);
        self.index = self.entries.len() as isize - 1;
        self.on_entry = false;
    }

    /// Back is offered from a fresh destination as soon as anything was
    /// recorded (`index >= 0`), not only when `index > 0`: the first Back
    /// stores the destination and returns to `entries[index]`, the place it
    /// was reached from.
    pub fn can_go_back(&self) -> bool {
        if self.on_entry {
            self.index > 0
        } else {
            self.index >= 0
        }
    }

    pub fn can_go_forward(&self) -> bool {
        self.index < self.entries.len() as isize - 1
    }

    /// Step back from `current`. Returns the location to show, or `None`
    /// if there is nothing behind.
    pub fn go_back(&mut self, current: T) -> Option<T> {
        if !self.can_go_back() {
            return None;
        }
        if self.on_entry {
            self.index -= 1;
        } else {
            self.entries.push(current);
            self.on_entry = true;
        }
        Some(self.entries[self.index as usize].clone())
    }

    /// Step forward. Returns the location to show, or `None` if there is
    /// nothing ahead.
    pub fn go_forward(&mut self) -> Option<T> {
        if !self.can_go_forward() {
            return None;
        }
        self.index += 1;
        self.on_entry = true;
        Some(self.entries[self.index as usize].clone())
    }

    #[cfg(test)]
    pub fn index(&self) -> isize {
        self.index
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drives a history the way the controller does, tracking the current location.
    struct Walker {
        history: NavigationHistory<&'static str>,
        current: &'static str,
    }

    impl Walker {
        fn new(start: &'static str) -> Self {
            Self {
                history: NavigationHistory::new(),
                current: start,
            }
        }

        fn go(&mut self, to: &'static str) {
            self.history.record_visit(self.current);
            self.current = to;
        }

        fn back(&mut self) -> bool {
            match self.history.go_back(self.current) {
                Some(node) => {
                    self.current = node;
                    true
                }
                None => false,
            }
        }

        fn forward(&mut self) -> bool {
            match self.history.go_forward() {
                Some(node) => {
                    self.current = node;
                    true
                }
                None => false,
            }
        }

        fn assert_index_in_bounds(&self) {
            let idx = self.history.index();
            assert!(idx >= -1);
            assert!(idx <= self.history.len() as isize - 1);
        }
    }

    #[test]
    fn empty_history() {
        let mut h: NavigationHistory<u32> = NavigationHistory::new();
        assert_eq!(h.index(), -1);
        assert!(h.is_empty());
        assert!(!h.can_go_back());
        assert!(!h.can_go_forward());
        assert_eq!(h.go_back(1), None);
        assert_eq!(h.go_forward(), None);
    }

    #[test]
    fn first_visit_records_origin() {
        let mut w = Walker::new("computer");
        w.go("C:");
        assert_eq!(w.history.entries(), &["computer"]);
        assert_eq!(w.history.index(), 0);
        assert!(w.history.can_go_back());
        assert!(!w.history.can_go_forward());
    }

    #[test]
    fn back_then_forward_round_trips() {
        let mut w = Walker::new("computer");
        w.go("C:");
        w.go("docs");

        assert!(w.back());
        assert_eq!(w.current, "C:");
        assert_eq!(w.history.entries()[w.history.index() as usize], w.current);
        assert!(w.back());
        assert_eq!(w.current, "computer");
        assert!(!w.back());
        assert_eq!(w.current, "computer");

        assert!(w.forward());
        assert_eq!(w.current, "C:");
        assert!(w.forward());
        assert_eq!(w.current, "docs");
        assert!(!w.forward());
        assert_eq!(w.history.entries()[w.history.index() as usize], "docs");
    }

    #[test]
    fn branching_discards_forward_entries() {
        let mut w = Walker::new("computer");
        w.go("A");
        assert!(w.back());
        w.go("B");

        assert!(!w.history.entries().contains(&"A"));
        assert!(!w.history.can_go_forward());

        assert!(w.back());
        assert_eq!(w.current, "computer");
        assert!(w.forward());
        assert_eq!(w.current, "B");
        assert!(!w.forward());
    }

    #[test]
    fn branching_mid_stack_truncates_only_forward_part() {
        let mut w = Walker::new("computer");
        w.go("C:");
        w.go("docs");
        w.go("photos");
        assert!(w.back());
        assert!(w.back());
        assert_eq!(w.current, "C:");

        w.go("music");
        assert_eq!(w.history.entries(), &["computer", "C:"]);
        assert!(!w.history.entries().contains(&"docs"));
        assert!(!w.history.entries().contains(&"photos"));

        assert!(w.back());
        assert_eq!(w.current, "C:");
        assert!(w.back());
        assert_eq!(w.current, "computer");
    }

    #[test]
    fn going_somewhere_while_on_tip_does_not_duplicate() {
        let mut w = Walker::new("computer");
        w.go("C:");
        w.go("docs");
        assert!(w.back());
        assert!(w.forward());
        assert_eq!(w.current, "docs");

        w.go("deep");
        assert_eq!(w.history.entries(), &["computer", "C:", "docs"]);
        assert!(w.back());
        assert_eq!(w.current, "docs");
    }

    #[test]
    fn index_stays_in_bounds_over_mixed_walk() {
        let mut w = Walker::new("root");
        let script = [
            "go:a", "go:b", "back", "back", "back", "fwd", "go:c", "fwd", "back", "go:d",
            "go:e", "back", "back", "back", "back", "fwd", "fwd", "fwd", "fwd", "go:f",
        ];
        let targets = ["a", "b", "c", "d", "e", "f"];
        for step in script {
            match step {
                "back" => {
                    if w.back() {
                        assert_eq!(w.history.entries()[w.history.index() as usize], w.current);
                    }
                }
                "fwd" => {
                    if w.forward() {
                        assert_eq!(w.history.entries()[w.history.index() as usize], w.current);
                    }
                }
                go => {
                    let name = &go[3..];
                    let to = targets.iter().find(|t| **t == name).copied().unwrap();
                    w.go(to);
                    assert_eq!(w.current, to);
                }
            }
            w.assert_index_in_bounds();
        }
    }
}
