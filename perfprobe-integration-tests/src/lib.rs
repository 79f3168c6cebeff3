//! End-to-end tests live in `tests/`; they drive the harness through the real client against the stub server.
