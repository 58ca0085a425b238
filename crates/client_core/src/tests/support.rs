//! In-memory data service for exercising the page view-models.

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Mutex,
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::{
    domain::{Bod, BodId, Club, ClubId},
    protocol::{BodUpdate, NewBod},
};

use crate::{data_service::ClubDataService, draft::BodDraft};

#[derive(Default)]
pub(crate) struct FakeDataService {
    bods: Mutex<Vec<Bod>>,
    clubs: Mutex<Vec<Club>>,
    creates: Mutex<Vec<NewBod>>,
    updates: Mutex<Vec<(BodId, BodUpdate)>>,
    fail_lists: AtomicBool,
    fail_writes: AtomicBool,
    list_calls: AtomicUsize,
}

impl FakeDataService {
    pub(crate) fn with_bods(bods: Vec<Bod>) -> Self {
        Self {
            bods: Mutex::new(bods),
            ..Self::default()
        }
    }

    pub(crate) fn with_clubs(clubs: Vec<Club>) -> Self {
        Self {
            clubs: Mutex::new(clubs),
            ..Self::default()
        }
    }

    pub(crate) fn fail_lists(&self, fail: bool) {
        self.fail_lists.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn creates(&self) -> Vec<NewBod> {
        self.creates.lock().expect("creates lock").clone()
    }

    pub(crate) fn updates(&self) -> Vec<(BodId, BodUpdate)> {
        self.updates.lock().expect("updates lock").clone()
    }

    pub(crate) fn stored_bods(&self) -> Vec<Bod> {
        self.bods.lock().expect("bods lock").clone()
    }
}

pub(crate) fn sample_bod(id: i64) -> Bod {
    Bod {
        id: BodId(id),
        first_name: format!("First{id}"),
        last_name: format!("Last{id}"),
        email: format!("bod{id}@example.com"),
        phone_no: "9876543210".into(),
        branch: "CSE".into(),
        usn: format!("1AB23CS{id:03}"),
        club_id: ClubId(1),
    }
}

/// True when every record attribute of `draft` equals `bod`'s.
pub(crate) fn draft_matches_record(draft: &BodDraft, bod: &Bod) -> bool {
    draft.id == bod.id
        && draft.first_name == bod.first_name
        && draft.last_name == bod.last_name
        && draft.email == bod.email
        && draft.phone_no == bod.phone_no
        && draft.branch == bod.branch
        && draft.usn == bod.usn
        && draft.club_id == bod.club_id
}

pub(crate) fn sample_club(id: i64, name: &str) -> Club {
    Club {
        id: ClubId(id),
        name: name.to_string(),
        tagline: format!("{name} tagline"),
        logo_url: None,
    }
}

#[async_trait]
impl ClubDataService for FakeDataService {
    async fn list_bods(&self) -> Result<Vec<Bod>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(anyhow!("list unavailable"));
        }
        Ok(self.stored_bods())
    }

    async fn create_bod(&self, bod: NewBod) -> Result<Bod> {
        self.creates.lock().expect("creates lock").push(bod.clone());
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(anyhow!("create rejected"));
        }
        let mut bods = self.bods.lock().expect("bods lock");
        let next = bods.iter().map(|b| b.id.0).max().unwrap_or(0) + 1;
        let created = Bod {
            id: bod.requested_id().unwrap_or(BodId(next)),
            first_name: bod.first_name,
            last_name: bod.last_name,
            email: bod.email,
            phone_no: bod.phone_no,
            branch: bod.branch,
            usn: bod.usn,
            club_id: bod.club_id,
        };
        bods.push(created.clone());
        Ok(created)
    }

    async fn update_bod(&self, bod_id: BodId, update: BodUpdate) -> Result<Bod> {
        self.updates
            .lock()
            .expect("updates lock")
            .push((bod_id, update.clone()));
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(anyhow!("update rejected"));
        }
        let mut bods = self.bods.lock().expect("bods lock");
        let bod = bods
            .iter_mut()
            .find(|b| b.id == bod_id)
            .ok_or_else(|| anyhow!("bod {bod_id} not found"))?;
        if let Some(v) = update.first_name {
            bod.first_name = v;
        }
        if let Some(v) = update.last_name {
            bod.last_name = v;
        }
        if let Some(v) = update.email {
            bod.email = v;
        }
        if let Some(v) = update.phone_no {
            bod.phone_no = v;
        }
        if let Some(v) = update.branch {
            bod.branch = v;
        }
        if let Some(v) = update.usn {
            bod.usn = v;
        }
        if let Some(v) = update.club_id {
            bod.club_id = v;
        }
        Ok(bod.clone())
    }

    async fn list_clubs(&self) -> Result<Vec<Club>> {
        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(anyhow!("clubs unavailable"));
        }
        Ok(self.clubs.lock().expect("clubs lock").clone())
    }
}
