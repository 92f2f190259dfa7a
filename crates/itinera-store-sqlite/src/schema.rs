//! SQL schema for the Itinera SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Journeys are owned by the main application; this table mirrors the
-- summary fields the sharing subsystem is allowed to read.
CREATE TABLE IF NOT EXISTS journeys (
    journey_id  TEXT PRIMARY KEY,
    owner_id    TEXT NOT NULL,
    title       TEXT NOT NULL,
    procedure   TEXT,
    destination TEXT
);

-- One row per invitation relationship. Rows are never hard-deleted:
-- declined/revoked rows are reinstated by a later invite for the same
-- email instead of inserting a duplicate.
CREATE TABLE IF NOT EXISTS collaborators (
    id               TEXT PRIMARY KEY,
    journey_id       TEXT NOT NULL REFERENCES journeys(journey_id),
    email            TEXT NOT NULL,   -- normalised lowercase
    role             TEXT NOT NULL,   -- 'owner' | 'viewer'
    status           TEXT NOT NULL,   -- 'pending' | 'accepted' | 'declined' | 'revoked'
    invitation_token TEXT NOT NULL UNIQUE,
    token_expires_at TEXT NOT NULL,   -- ISO 8601 UTC
    invited_by       TEXT NOT NULL,
    invited_at       TEXT NOT NULL,
    accepted_at      TEXT,
    user_id          TEXT,
    CHECK ((status = 'accepted') = (user_id IS NOT NULL)),
    CHECK ((status = 'accepted') = (accepted_at IS NOT NULL))
);

-- At most one live grant per invitee and journey. Scoped to active
-- statuses so declined/revoked history never blocks a re-invite.
CREATE UNIQUE INDEX IF NOT EXISTS collaborators_active_email_idx
    ON collaborators(journey_id, email)
    WHERE status IN ('pending', 'accepted');

-- The audit log is strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS audit_log (
    id          TEXT PRIMARY KEY,
    journey_id  TEXT NOT NULL,
    actor_id    TEXT,                 -- NULL for unauthenticated link holders
    action      TEXT NOT NULL,        -- 'invite_sent' | 'invite_accepted' | 'invite_declined' | 'access_revoked'
    details     TEXT NOT NULL DEFAULT '{}',
    recorded_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS collaborators_journey_idx ON collaborators(journey_id);
CREATE INDEX IF NOT EXISTS audit_journey_idx         ON audit_log(journey_id);

PRAGMA user_version = 1;
";
