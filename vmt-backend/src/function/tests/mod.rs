//! Tests for function entry, the call/return protocol and bootstrap
