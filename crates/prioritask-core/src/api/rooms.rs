//! Rooms (shared households) and the selected-room pointer.
//!
//! The selected room lives in the session store under `roomId` and
//! survives logout.

use tracing::debug;

use crate::api::segment;
use crate::client::{ApiClient, ApiRequest};
use crate::error::Result;
use crate::types::{CreatedRoom, Room, RoomName, Task};
use crate::validation;

impl ApiClient {
    pub async fn list_rooms(&self) -> Result<Vec<Room>> {
        self.get("/rooms").await
    }

    /// Create a room and make it the selected one.
    pub async fn create_room(&self, name: &str) -> Result<CreatedRoom> {
        let nombre = validation::room_name(name)?;
        let room: CreatedRoom = self.post("/rooms", &RoomName { nombre }).await?;
        self.select_room(&room.id)?;
        Ok(room)
    }

    /// Tasks of a room, newest first, at most `limit` of them. Selects the
    /// room once the listing succeeds.
    pub async fn room_tasks(&self, room_id: &str, limit: Option<u32>) -> Result<Vec<Task>> {
        let request = ApiRequest::get(format!("/rooms/{}/tasks", segment(room_id)))
            .query_opt("limit", limit);
        let tasks = self.execute(request).await?;
        self.select_room(room_id)?;
        Ok(tasks)
    }

    pub fn select_room(&self, room_id: &str) -> Result<()> {
        debug!(room_id, "Selecting room");
        self.session().set_room_id(room_id)
    }

    pub fn selected_room(&self) -> Result<Option<String>> {
        self.session().room_id()
    }

    pub fn clear_selected_room(&self) -> Result<()> {
        self.session().clear_room_id()
    }
}
