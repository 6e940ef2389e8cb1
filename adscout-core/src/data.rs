use crate::model::{Prospect, SignalSet};
use crate::scoring::Qualification;
use rusqlite::{Connection, OptionalExtension, Result, params};
use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

pub struct Database {
    conn: Connection,
}

fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}

impl Database {
    pub fn drop(path: &Path) {
        fs::remove_file(path).unwrap();
    }

    pub fn exists(path: &Path) -> bool {
        path.exists()
    }

    pub fn new(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // Optimize for concurrent writes
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA cache_size = -64000;  -- 64MB cache
            PRAGMA temp_store = MEMORY;
            PRAGMA foreign_keys = ON;
            ",
        )?;

        let db = Database { conn };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            -- Hunt sessions
            CREATE TABLE IF NOT EXISTS hunt_sessions (
    id TEXT PRIMARY KEY,
    start_time INTEGER NOT NULL,
    end_time INTEGER,
    status TEXT NOT NULL CHECK(status IN ('running', 'completed', 'failed', 'cancelled')),
    query TEXT NOT NULL,      -- JSON array of keywords or seed domains
    region TEXT,
    configuration TEXT        -- JSON scoring config used
);

-- Prospects discovered during a hunt
CREATE TABLE IF NOT EXISTS prospects (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id TEXT NOT NULL,
    domain TEXT NOT NULL,
    company_name TEXT NOT NULL,
    discovered_via TEXT NOT NULL,
    discovered_at INTEGER NOT NULL,

    FOREIGN KEY(session_id) REFERENCES hunt_sessions(id) ON DELETE CASCADE,
    UNIQUE(session_id, domain)
);

CREATE INDEX IF NOT EXISTS idx_prospects_session ON prospects(session_id);
CREATE INDEX IF NOT EXISTS idx_prospects_domain ON prospects(domain);

-- Raw signals backing a qualification
CREATE TABLE IF NOT EXISTS signals (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    prospect_id INTEGER NOT NULL,
    kind TEXT NOT NULL CHECK(kind IN ('ad_volume', 'creative_diversity', 'load_time', 'geo_spread')),
    value REAL,               -- NULL when unavailable
    confidence REAL NOT NULL CHECK(confidence BETWEEN 0.0 AND 1.0),

    FOREIGN KEY(prospect_id) REFERENCES prospects(id) ON DELETE CASCADE,
    UNIQUE(prospect_id, kind)
);

CREATE INDEX IF NOT EXISTS idx_signals_prospect ON signals(prospect_id);

-- Scoring outcomes
CREATE TABLE IF NOT EXISTS qualifications (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    prospect_id INTEGER UNIQUE NOT NULL,
    score INTEGER NOT NULL CHECK(score BETWEEN 0 AND 100),
    confidence REAL NOT NULL CHECK(confidence BETWEEN 0.0 AND 1.0),
    qualified BOOLEAN NOT NULL,
    tier TEXT NOT NULL CHECK(tier IN ('hot', 'warm', 'cool', 'cold')),
    scored_at INTEGER NOT NULL,

    FOREIGN KEY(prospect_id) REFERENCES prospects(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_qualifications_score ON qualifications(score);
CREATE INDEX IF NOT EXISTS idx_qualifications_tier ON qualifications(tier);

-- Which rules fired, for the audit trail in reports
CREATE TABLE IF NOT EXISTS rule_hits (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    qualification_id INTEGER NOT NULL,
    label TEXT NOT NULL,
    points INTEGER NOT NULL,
    observed REAL NOT NULL,

    FOREIGN KEY(qualification_id) REFERENCES qualifications(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_rule_hits_qualification ON rule_hits(qualification_id);
            ",
        )?;
        Ok(())
    }

    // Session management
    pub fn create_session(
        &self,
        query: &str,
        region: Option<&str>,
        configuration: Option<&str>,
    ) -> Result<String> {
        let session_id = uuid::Uuid::new_v4().to_string();
        let timestamp = current_timestamp();

        self.conn.execute(
            "INSERT INTO hunt_sessions (id, start_time, status, query, region, configuration) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![&session_id, timestamp, "running", query, region, configuration],
        )?;

        Ok(session_id)
    }

    pub fn complete_session(&self, session_id: &str) -> Result<()> {
        let timestamp = current_timestamp();
        self.conn.execute(
            "UPDATE hunt_sessions SET status = ?1, end_time = ?2 WHERE id = ?3",
            params!["completed", timestamp, session_id],
        )?;
        Ok(())
    }

    pub fn fail_session(&self, session_id: &str) -> Result<()> {
        let timestamp = current_timestamp();
        self.conn.execute(
            "UPDATE hunt_sessions SET status = ?1, end_time = ?2 WHERE id = ?3",
            params!["failed", timestamp, session_id],
        )?;
        Ok(())
    }

    /// Most recently started session, for `report --session latest`.
    pub fn latest_session_id(&self) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id FROM hunt_sessions ORDER BY start_time DESC, id DESC LIMIT 1")?;

        let result = stmt.query_row([], |row| row.get(0)).optional()?;
        Ok(result)
    }

    // Prospect operations
    pub fn insert_prospect(&self, session_id: &str, prospect: &Prospect) -> Result<i64> {
        let timestamp = current_timestamp();

        self.conn.execute(
            "INSERT INTO prospects (session_id, domain, company_name, discovered_via, discovered_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                session_id,
                &prospect.domain,
                &prospect.company_name,
                &prospect.discovered_via,
                timestamp,
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_prospect_by_domain(&self, session_id: &str, domain: &str) -> Result<Option<i64>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id FROM prospects WHERE session_id = ?1 AND domain = ?2")?;

        let result = stmt
            .query_row(params![session_id, domain], |row| row.get(0))
            .optional()?;
        Ok(result)
    }

    // Signal operations
    pub fn insert_signals(&self, prospect_id: i64, signals: &SignalSet) -> Result<()> {
        for (kind, signal) in signals.iter() {
            self.conn.execute(
                "INSERT INTO signals (prospect_id, kind, value, confidence) VALUES (?1, ?2, ?3, ?4)",
                params![
                    prospect_id,
                    kind.as_str(),
                    signal.value.as_f64(),
                    signal.confidence,
                ],
            )?;
        }
        Ok(())
    }

    // Qualification operations
    pub fn insert_qualification(
        &self,
        prospect_id: i64,
        qualification: &Qualification,
    ) -> Result<i64> {
        let timestamp = current_timestamp();

        self.conn.execute(
            "INSERT INTO qualifications (prospect_id, score, confidence, qualified, tier, scored_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                prospect_id,
                qualification.score,
                qualification.confidence,
                qualification.qualified,
                qualification.tier.as_str(),
                timestamp,
            ],
        )?;

        let qualification_id = self.conn.last_insert_rowid();

        for hit in &qualification.hits {
            self.conn.execute(
                "INSERT INTO rule_hits (qualification_id, label, points, observed) VALUES (?1, ?2, ?3, ?4)",
                params![qualification_id, &hit.label, hit.points, hit.observed],
            )?;
        }

        Ok(qualification_id)
    }

    /// Scored prospects for a session, best first.
    pub fn get_scored_by_session(
        &self,
        session_id: &str,
    ) -> Result<Vec<(i64, String, String, i64, f64, bool, String)>> {
        let mut stmt = self.conn.prepare(
            "SELECT p.id, p.domain, p.company_name, q.score, q.confidence, q.qualified, q.tier
             FROM prospects p
             JOIN qualifications q ON q.prospect_id = p.id
             WHERE p.session_id = ?1
             ORDER BY q.score DESC, q.confidence DESC, p.domain",
        )?;

        let rows = stmt
            .query_map(params![session_id], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                    row.get(6)?,
                ))
            })?
            .collect::<Result<Vec<_>>>()?;

        Ok(rows)
    }

    pub fn get_tier_counts(&self, session_id: &str) -> Result<Vec<(String, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT q.tier, COUNT(*)
             FROM qualifications q
             JOIN prospects p ON q.prospect_id = p.id
             WHERE p.session_id = ?1
             GROUP BY q.tier",
        )?;

        let counts = stmt
            .query_map(params![session_id], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>>>()?;

        Ok(counts)
    }

    pub fn get_rule_hits_by_prospect(&self, prospect_id: i64) -> Result<Vec<(String, i64, f64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT h.label, h.points, h.observed
             FROM rule_hits h
             JOIN qualifications q ON h.qualification_id = q.id
             WHERE q.prospect_id = ?1
             ORDER BY h.points DESC, h.label",
        )?;

        let hits = stmt
            .query_map(params![prospect_id], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })?
            .collect::<Result<Vec<_>>>()?;

        Ok(hits)
    }

    pub fn get_connection(&self) -> &Connection {
        &self.conn
    }
}
