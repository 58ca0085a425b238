use shared::{
    domain::{Bod, BodId, Club, ClubId},
    error::ApiError,
    protocol::{BodUpdate, NewBod, NewClub},
};
use storage::{BodChanges, NewBodRecord, Storage};
use tracing::info;

pub mod password;

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
}

pub async fn list_bods(ctx: &ApiContext) -> Result<Vec<Bod>, ApiError> {
    ctx.storage.list_bods().await.map_err(internal)
}

pub async fn get_bod(ctx: &ApiContext, bod_id: BodId) -> Result<Bod, ApiError> {
    ctx.storage
        .get_bod(bod_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| bod_not_found(bod_id))
}

pub async fn create_bod(ctx: &ApiContext, req: NewBod) -> Result<Bod, ApiError> {
    let record = new_bod_record(req)?;
    ensure_club_exists(ctx, record.club_id).await?;

    let bod = ctx
        .storage
        .create_bod(&record)
        .await
        .map_err(|e| write_failure(e, "bod"))?;
    info!(bod_id = bod.id.0, club_id = bod.club_id.0, "bod created");
    Ok(bod)
}

/// Existence of the BOD is checked before anything in the payload, so a
/// missing record is always `NotFound`.
pub async fn update_bod(
    ctx: &ApiContext,
    bod_id: BodId,
    req: BodUpdate,
) -> Result<Bod, ApiError> {
    get_bod(ctx, bod_id).await?;
    let changes = bod_changes(req)?;
    if let Some(club_id) = changes.club_id {
        ensure_club_exists(ctx, club_id).await?;
    }

    let bod = ctx
        .storage
        .update_bod(bod_id, &changes)
        .await
        .map_err(|e| write_failure(e, "bod"))?
        .ok_or_else(|| bod_not_found(bod_id))?;
    info!(bod_id = bod.id.0, "bod updated");
    Ok(bod)
}

fn new_bod_record(req: NewBod) -> Result<NewBodRecord, ApiError> {
    ensure_present(&[
        ("first_name", &req.first_name),
        ("last_name", &req.last_name),
        ("email", &req.email),
        ("password", &req.password),
        ("phone_no", &req.phone_no),
        ("branch", &req.branch),
        ("usn", &req.usn),
    ])?;
    if let Some(id) = req.id.filter(|id| id.0 < 0) {
        return Err(ApiError::validation(format!(
            "bod id must not be negative, got {id}"
        )));
    }

    let password_hash = password::hash_password(&req.password).map_err(internal)?;
    Ok(NewBodRecord {
        id: req.requested_id(),
        first_name: req.first_name,
        last_name: req.last_name,
        email: req.email,
        password_hash,
        phone_no: req.phone_no,
        branch: req.branch,
        usn: req.usn,
        club_id: req.club_id,
    })
}

fn bod_changes(req: BodUpdate) -> Result<BodChanges, ApiError> {
    let provided: Vec<(&str, &String)> = [
        ("first_name", req.first_name.as_ref()),
        ("last_name", req.last_name.as_ref()),
        ("email", req.email.as_ref()),
        ("phone_no", req.phone_no.as_ref()),
        ("branch", req.branch.as_ref()),
        ("usn", req.usn.as_ref()),
    ]
    .into_iter()
    .filter_map(|(field, value)| value.map(|v| (field, v)))
    .collect();
    ensure_present(&provided)?;

    // an empty password in an update means "keep the current one"
    let password_hash = match req.password.as_deref().filter(|p| !p.is_empty()) {
        Some(password) => Some(password::hash_password(password).map_err(internal)?),
        None => None,
    };

    Ok(BodChanges {
        first_name: req.first_name,
        last_name: req.last_name,
        email: req.email,
        password_hash,
        phone_no: req.phone_no,
        branch: req.branch,
        usn: req.usn,
        club_id: req.club_id,
    })
}

pub async fn list_clubs(ctx: &ApiContext) -> Result<Vec<Club>, ApiError> {
    ctx.storage.list_clubs().await.map_err(internal)
}

pub async fn get_club(ctx: &ApiContext, club_id: ClubId) -> Result<Club, ApiError> {
    ctx.storage
        .get_club(club_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| ApiError::not_found(format!("club {club_id} not found")))
}

pub async fn create_club(ctx: &ApiContext, req: NewClub) -> Result<Club, ApiError> {
    ensure_present(&[("name", &req.name)])?;
    let logo_url = req
        .logo_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty());
    let club = ctx
        .storage
        .create_club(req.name.trim(), req.tagline.trim(), logo_url)
        .await
        .map_err(|e| write_failure(e, "club"))?;
    info!(club_id = club.id.0, name = %club.name, "club created");
    Ok(club)
}

fn ensure_present(fields: &[(&str, &String)]) -> Result<(), ApiError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| *field)
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    Err(ApiError::validation(format!(
        "missing required fields: {}",
        missing.join(", ")
    )))
}

async fn ensure_club_exists(ctx: &ApiContext, club_id: ClubId) -> Result<(), ApiError> {
    ctx.storage
        .get_club(club_id)
        .await
        .map_err(internal)?
        .map(|_| ())
        .ok_or_else(|| ApiError::validation(format!("club {club_id} does not exist")))
}

fn bod_not_found(bod_id: BodId) -> ApiError {
    ApiError::not_found(format!("bod {bod_id} not found"))
}

fn write_failure(err: anyhow::Error, entity: &str) -> ApiError {
    if storage::is_unique_violation(&err) {
        ApiError::conflict(format!(
            "a {entity} with the same unique fields already exists"
        ))
    } else if storage::is_foreign_key_violation(&err) {
        ApiError::validation("referenced club does not exist")
    } else {
        internal(err)
    }
}

fn internal(err: anyhow::Error) -> ApiError {
    ApiError::internal(err.to_string())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
