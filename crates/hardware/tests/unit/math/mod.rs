//! Integer addition tests.
