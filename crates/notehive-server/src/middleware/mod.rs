// SPDX-License-Identifier: Apache-2.0

mod request_tracing;

pub use request_tracing::{request_id_of, request_tracing_middleware, RequestId};
