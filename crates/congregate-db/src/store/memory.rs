//! In-process store.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use congregate_core::types::{MemberId, OrganizationContext};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::model::assignment::{EventVolunteer, NewVolunteer, VolunteerAssignment, VolunteerChanges};
use crate::model::attendance::{Attendance, MemberAttendance, NewAttendance};
use crate::model::event::{EventChanges, EventRecord, EventSummary, NewEvent};
use crate::store::{AttendanceStore, EventFilter, EventStore, VolunteerStore};

#[derive(Debug, Default)]
struct Tables {
    events: HashMap<String, EventRecord>,
    /// Insertion order breaks `created_at` ties.
    volunteers: Vec<EventVolunteer>,
    attendance: Vec<Attendance>,
}

impl Tables {
    fn event(&self, ctx: &OrganizationContext, id: &str) -> Option<&EventRecord> {
        self.events
            .get(id)
            .filter(|event| event.organization_id == ctx.organization_id)
    }

    fn require_event(&self, ctx: &OrganizationContext, id: &str) -> DbResult<&EventRecord> {
        self.event(ctx, id)
            .ok_or_else(|| DbError::MissingReference(format!("event '{id}'")))
    }

    /// Removes the events matching `doomed` along with the rows that reference them.
    fn remove_events(&mut self, doomed: impl Fn(&EventRecord) -> bool) -> usize {
        let removed: HashSet<String> = self
            .events
            .values()
            .filter(|event| doomed(event))
            .map(|event| event.id.clone())
            .collect();
        if removed.is_empty() {
            return 0;
        }

        self.events.retain(|id, _| !removed.contains(id));
        self.volunteers
            .retain(|volunteer| !removed.contains(&volunteer.event_id));
        self.attendance
            .retain(|attendance| !removed.contains(&attendance.event_id));
        removed.len()
    }
}

/// ## Summary
/// Store backed by maps guarded by one async lock. Clones share the same tables.
///
/// Event ids are unique across organizations, matching the `events` primary key.
/// A batch insert either stores every row or none.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored events across all organizations.
    pub async fn len(&self) -> usize {
        self.tables.read().await.events.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tables.read().await.events.is_empty()
    }
}

fn sorted(mut events: Vec<EventRecord>) -> Vec<EventRecord> {
    events.sort_by(|a, b| a.start_date.cmp(&b.start_date).then_with(|| a.id.cmp(&b.id)));
    events
}

impl EventStore for MemoryStore {
    #[tracing::instrument(skip(self, events), fields(organization_id = %ctx.organization_id, count = events.len()))]
    async fn insert_events(
        &self,
        ctx: &OrganizationContext,
        events: &[NewEvent],
    ) -> DbResult<Vec<EventRecord>> {
        let mut tables = self.tables.write().await;

        let mut batch_ids = HashSet::with_capacity(events.len());
        for event in events {
            if tables.events.contains_key(&event.id) || !batch_ids.insert(event.id.as_str()) {
                tracing::warn!(id = %event.id, "Duplicate event id");
                return Err(DbError::Conflict(format!("event id '{}' already exists", event.id)));
            }
        }

        let now = Utc::now();
        let records: Vec<EventRecord> = events
            .iter()
            .map(|event| EventRecord::from_new(ctx.organization_id, event.clone(), now))
            .collect();
        for record in &records {
            tables.events.insert(record.id.clone(), record.clone());
        }

        tracing::debug!("Inserted events");
        Ok(records)
    }

    async fn get_event(&self, ctx: &OrganizationContext, id: &str) -> DbResult<Option<EventRecord>> {
        Ok(self.tables.read().await.event(ctx, id).cloned())
    }

    async fn list_events(
        &self,
        ctx: &OrganizationContext,
        filter: EventFilter,
    ) -> DbResult<Vec<EventRecord>> {
        let matching = self
            .tables
            .read()
            .await
            .events
            .values()
            .filter(|event| event.organization_id == ctx.organization_id && filter.matches(event))
            .cloned()
            .collect();

        let mut events = sorted(matching);
        if let Some(limit) = filter.limit {
            events.truncate(limit);
        }
        Ok(events)
    }

    async fn list_instances(
        &self,
        ctx: &OrganizationContext,
        parent_id: &str,
    ) -> DbResult<Vec<EventRecord>> {
        let instances = self
            .tables
            .read()
            .await
            .events
            .values()
            .filter(|event| {
                event.organization_id == ctx.organization_id
                    && event.parent_event_id.as_deref() == Some(parent_id)
            })
            .cloned()
            .collect();
        Ok(sorted(instances))
    }

    async fn update_event(
        &self,
        ctx: &OrganizationContext,
        id: &str,
        changes: &EventChanges,
    ) -> DbResult<Option<EventRecord>> {
        let mut tables = self.tables.write().await;
        let Some(event) = tables
            .events
            .get_mut(id)
            .filter(|event| event.organization_id == ctx.organization_id)
        else {
            return Ok(None);
        };
        changes.apply(event, Utc::now());
        Ok(Some(event.clone()))
    }

    async fn update_instances(
        &self,
        ctx: &OrganizationContext,
        parent_id: &str,
        changes: &EventChanges,
    ) -> DbResult<usize> {
        let now = Utc::now();
        let mut updated = 0;
        for event in self.tables.write().await.events.values_mut() {
            if event.organization_id == ctx.organization_id
                && event.parent_event_id.as_deref() == Some(parent_id)
            {
                changes.apply(event, now);
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn delete_event(&self, ctx: &OrganizationContext, id: &str) -> DbResult<usize> {
        Ok(self
            .tables
            .write()
            .await
            .remove_events(|event| event.id == id && event.organization_id == ctx.organization_id))
    }

    async fn delete_instances(&self, ctx: &OrganizationContext, parent_id: &str) -> DbResult<usize> {
        Ok(self.tables.write().await.remove_events(|event| {
            event.organization_id == ctx.organization_id
                && event.parent_event_id.as_deref() == Some(parent_id)
        }))
    }
}

impl VolunteerStore for MemoryStore {
    #[tracing::instrument(skip(self, volunteer), fields(organization_id = %ctx.organization_id, event_id = %volunteer.event_id))]
    async fn insert_volunteer(
        &self,
        ctx: &OrganizationContext,
        volunteer: NewVolunteer,
    ) -> DbResult<EventVolunteer> {
        let mut tables = self.tables.write().await;
        tables.require_event(ctx, &volunteer.event_id)?;

        let stored = EventVolunteer::from_new(ctx.organization_id, Uuid::now_v7(), volunteer, Utc::now());
        tables.volunteers.push(stored.clone());
        Ok(stored)
    }

    async fn update_volunteer(
        &self,
        ctx: &OrganizationContext,
        id: Uuid,
        changes: &VolunteerChanges,
    ) -> DbResult<Option<EventVolunteer>> {
        let mut tables = self.tables.write().await;
        let Some(volunteer) = tables
            .volunteers
            .iter_mut()
            .find(|volunteer| volunteer.id == id && volunteer.organization_id == ctx.organization_id)
        else {
            return Ok(None);
        };
        changes.apply(volunteer, Utc::now());
        Ok(Some(volunteer.clone()))
    }

    async fn delete_volunteer(&self, ctx: &OrganizationContext, id: Uuid) -> DbResult<usize> {
        let mut tables = self.tables.write().await;
        let before = tables.volunteers.len();
        tables
            .volunteers
            .retain(|volunteer| volunteer.id != id || volunteer.organization_id != ctx.organization_id);
        Ok(before - tables.volunteers.len())
    }

    async fn list_volunteers(
        &self,
        ctx: &OrganizationContext,
        event_id: &str,
    ) -> DbResult<Vec<EventVolunteer>> {
        let mut volunteers: Vec<EventVolunteer> = self
            .tables
            .read()
            .await
            .volunteers
            .iter()
            .filter(|volunteer| {
                volunteer.organization_id == ctx.organization_id && volunteer.event_id == event_id
            })
            .cloned()
            .collect();
        volunteers.sort_by_key(|volunteer| volunteer.created_at);
        Ok(volunteers)
    }

    async fn list_assignments(&self, ctx: &OrganizationContext) -> DbResult<Vec<VolunteerAssignment>> {
        let tables = self.tables.read().await;
        let mut assignments: Vec<VolunteerAssignment> = tables
            .volunteers
            .iter()
            .filter(|volunteer| volunteer.organization_id == ctx.organization_id)
            .filter_map(|volunteer| {
                let event = tables.event(ctx, &volunteer.event_id)?;
                Some(VolunteerAssignment {
                    volunteer: volunteer.clone(),
                    event: EventSummary::from(event),
                })
            })
            .collect();
        assignments.sort_by(|a, b| {
            a.event
                .start_date
                .cmp(&b.event.start_date)
                .then_with(|| a.volunteer.created_at.cmp(&b.volunteer.created_at))
        });
        Ok(assignments)
    }
}

impl AttendanceStore for MemoryStore {
    #[tracing::instrument(skip(self, attendance), fields(organization_id = %ctx.organization_id, event_id = %attendance.event_id))]
    async fn upsert_attendance(
        &self,
        ctx: &OrganizationContext,
        attendance: NewAttendance<'_>,
    ) -> DbResult<Attendance> {
        let mut tables = self.tables.write().await;
        tables.require_event(ctx, attendance.event_id)?;

        let now = Utc::now();
        if let Some(existing) = tables.attendance.iter_mut().find(|record| {
            record.event_id == attendance.event_id && record.member_id == attendance.member_id
        }) {
            existing.status = attendance.status;
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        let stored = Attendance {
            organization_id: ctx.organization_id,
            event_id: attendance.event_id.to_string(),
            member_id: attendance.member_id,
            status: attendance.status,
            created_at: now,
            updated_at: now,
        };
        tables.attendance.push(stored.clone());
        Ok(stored)
    }

    async fn list_event_attendance(
        &self,
        ctx: &OrganizationContext,
        event_id: &str,
    ) -> DbResult<Vec<Attendance>> {
        let mut records: Vec<Attendance> = self
            .tables
            .read()
            .await
            .attendance
            .iter()
            .filter(|record| record.organization_id == ctx.organization_id && record.event_id == event_id)
            .cloned()
            .collect();
        records.sort_by_key(|record| record.created_at);
        Ok(records)
    }

    async fn list_member_attendance(
        &self,
        ctx: &OrganizationContext,
        member_id: MemberId,
    ) -> DbResult<Vec<MemberAttendance>> {
        let tables = self.tables.read().await;
        // Newest first, later insertions ahead of earlier ones on ties.
        let mut records: Vec<MemberAttendance> = tables
            .attendance
            .iter()
            .rev()
            .filter(|record| record.organization_id == ctx.organization_id && record.member_id == member_id)
            .filter_map(|record| {
                let event = tables.event(ctx, &record.event_id)?;
                Some(MemberAttendance {
                    attendance: record.clone(),
                    event: EventSummary::from(event),
                })
            })
            .collect();
        records.sort_by(|a, b| b.attendance.created_at.cmp(&a.attendance.created_at));
        Ok(records)
    }
}
