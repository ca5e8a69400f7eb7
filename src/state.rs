//! Router history state

use crate::params::Location;

/// Direction of a committed navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDirection {
    Forward,
    Back,
    Replace,
}

/// A committed change of the current location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteChangeEvent {
    pub from: Option<String>,
    pub to: String,
    pub direction: NavigationDirection,
}

/// Navigation history
#[derive(Debug, Clone)]
pub struct RouterState {
    /// Full paths, oldest first
    history: Vec<String>,
    /// Current position in history
    current: usize,
}

impl RouterState {
    /// Create a new router state positioned at `initial`.
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            history: vec![initial.into()],
            current: 0,
        }
    }

    /// Current full path, including query.
    pub fn current_full_path(&self) -> &str {
        &self.history[self.current]
    }

    /// Current location split into path and query.
    pub fn current_location(&self) -> Location {
        Location::parse(self.current_full_path())
    }

    /// Navigate to a new path, dropping any forward history
    pub fn push(&mut self, full_path: String) -> RouteChangeEvent {
        let from = Some(self.current_full_path().to_string());

        self.history.truncate(self.current + 1);
        self.history.push(full_path.clone());
        self.current += 1;

        RouteChangeEvent {
            from,
            to: full_path,
            direction: NavigationDirection::Forward,
        }
    }

    /// Replace current path
    pub fn replace(&mut self, full_path: String) -> RouteChangeEvent {
        let from = Some(self.current_full_path().to_string());

        self.history[self.current] = full_path.clone();

        RouteChangeEvent {
            from,
            to: full_path,
            direction: NavigationDirection::Replace,
        }
    }

    /// Go back in history
    pub fn back(&mut self) -> Option<RouteChangeEvent> {
        if self.current > 0 {
            let from = Some(self.current_full_path().to_string());
            self.current -= 1;
            let to = self.current_full_path().to_string();

            Some(RouteChangeEvent {
                from,
                to,
                direction: NavigationDirection::Back,
            })
        } else {
            None
        }
    }

    /// Go forward in history
    pub fn forward(&mut self) -> Option<RouteChangeEvent> {
        if self.can_go_forward() {
            let from = Some(self.current_full_path().to_string());
            self.current += 1;
            let to = self.current_full_path().to_string();

            Some(RouteChangeEvent {
                from,
                to,
                direction: NavigationDirection::Forward,
            })
        } else {
            None
        }
    }

    pub fn can_go_back(&self) -> bool {
        self.current > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.current + 1 < self.history.len()
    }

    /// Peek at the path `back()` would reach, without navigating.
    pub fn peek_back_path(&self) -> Option<&str> {
        self.current
            .checked_sub(1)
            .map(|index| self.history[index].as_str())
    }

    /// Peek at the path `forward()` would reach, without navigating.
    pub fn peek_forward_path(&self) -> Option<&str> {
        self.history.get(self.current + 1).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

impl Default for RouterState {
    fn default() -> Self {
        Self::new("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation() {
        let mut state = RouterState::default();

        assert_eq!(state.current_full_path(), "/");

        state.push("/users".to_string());
        assert_eq!(state.current_full_path(), "/users");

        state.push("/users/123?tab=info".to_string());
        assert_eq!(state.current_location().path, "/users/123");

        assert_eq!(state.peek_back_path(), Some("/users"));
        state.back();
        assert_eq!(state.current_full_path(), "/users");

        state.forward();
        assert_eq!(state.current_full_path(), "/users/123?tab=info");
        assert!(!state.can_go_forward());
    }

    #[test]
    fn test_push_drops_forward_history() {
        let mut state = RouterState::default();
        state.push("/a".to_string());
        state.push("/b".to_string());
        state.back();
        state.push("/c".to_string());

        assert_eq!(state.len(), 3);
        assert_eq!(state.peek_forward_path(), None);
    }

    #[test]
    fn test_replace() {
        let mut state = RouterState::default();

        state.push("/users".to_string());
        let event = state.replace("/posts".to_string());

        assert_eq!(state.current_full_path(), "/posts");
        assert_eq!(state.len(), 2);
        assert_eq!(event.direction, NavigationDirection::Replace);
        assert_eq!(event.from.as_deref(), Some("/users"));
    }

    #[test]
    fn test_back_at_start_is_none() {
        let mut state = RouterState::new("/home");
        assert!(state.back().is_none());
        assert!(state.peek_back_path().is_none());
    }
}
