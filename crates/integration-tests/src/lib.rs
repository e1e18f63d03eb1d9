//! End-to-end tests for the crossbar gateway live under `tests/`
