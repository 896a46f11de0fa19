//! Host-style sessions: note traffic spread over many windows.

mod traffic;

pub use traffic::bench_sessions;
