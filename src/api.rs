//! Seam between the browser and the inspection API.
//!
//! [`MemoryApi`] is what the browser talks to; the HTTP client from the SDK
//! implements it, tests substitute an in-memory fake.

use crate::sdk::{
    self, EventQuery, EventsPage, Memory, MemorySummary, RecordQuery, RecordsPage, RetrieveRequest,
};

/// Read-only operations of the inspection API.
///
/// # Errors
///
/// Every method fails with [`sdk::Error`] on transport failures, non-success
/// statuses (`HTTP {status}: {status text}`) and unparsable bodies.
#[async_trait::async_trait]
pub trait MemoryApi: Send + Sync {
    /// `GET /api/memories`
    async fn list_memories(&self) -> sdk::Result<Vec<MemorySummary>>;

    /// `GET /api/memories/{id}`
    async fn get_memory(&self, memory_id: &str) -> sdk::Result<Memory>;

    /// `GET /api/memories/{id}/events`
    async fn list_events(&self, memory_id: &str, query: &EventQuery) -> sdk::Result<EventsPage>;

    /// `GET /api/memories/{id}/records`
    async fn list_records(&self, memory_id: &str, query: &RecordQuery) -> sdk::Result<RecordsPage>;

    /// `POST /api/memories/{id}/retrieve`
    async fn retrieve(&self, memory_id: &str, request: &RetrieveRequest)
    -> sdk::Result<RecordsPage>;
}

#[async_trait::async_trait]
impl MemoryApi for sdk::Client {
    async fn list_memories(&self) -> sdk::Result<Vec<MemorySummary>> {
        self.memories().list().await
    }

    async fn get_memory(&self, memory_id: &str) -> sdk::Result<Memory> {
        self.memories().get(memory_id).await
    }

    async fn list_events(&self, memory_id: &str, query: &EventQuery) -> sdk::Result<EventsPage> {
        self.memories().list_events(memory_id, query).await
    }

    async fn list_records(&self, memory_id: &str, query: &RecordQuery) -> sdk::Result<RecordsPage> {
        self.memories().list_records(memory_id, query).await
    }

    async fn retrieve(
        &self,
        memory_id: &str,
        request: &RetrieveRequest,
    ) -> sdk::Result<RecordsPage> {
        self.memories().retrieve(memory_id, request).await
    }
}
