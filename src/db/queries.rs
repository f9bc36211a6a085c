use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rusqlite::{params, Connection};

use crate::models::{Appointment, AppointmentStatus, HalfDay};

const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

const APPOINTMENT_COLUMNS: &str =
    "id, session_id, name, phone, reason, date, time, half_day, status, created_at";

// ── Appointments ──

pub fn create_appointment(conn: &Connection, appt: &Appointment) -> anyhow::Result<()> {
    let date = appt.date.format("%Y-%m-%d").to_string();
    let time = appt.time.format("%H:%M").to_string();
    let created_at = appt.created_at.format(DATETIME_FMT).to_string();

    conn.execute(
        "INSERT INTO appointments (id, session_id, name, phone, reason, date, time, half_day, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            appt.id,
            appt.session_id,
            appt.name,
            appt.phone,
            appt.reason,
            date,
            time,
            appt.half_day.as_str(),
            appt.status.as_str(),
            created_at,
        ],
    )?;
    Ok(())
}

/// Newest first.
pub fn list_appointments(
    conn: &Connection,
    status_filter: Option<AppointmentStatus>,
    limit: i64,
) -> anyhow::Result<Vec<Appointment>> {
    let (sql, params_vec): (String, Vec<Box<dyn rusqlite::types::ToSql>>) = match status_filter {
        Some(status) => (
            format!(
                "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE status = ?1 \
                 ORDER BY created_at DESC, rowid DESC LIMIT ?2"
            ),
            vec![
                Box::new(status.as_str().to_string()) as Box<dyn rusqlite::types::ToSql>,
                Box::new(limit),
            ],
        ),
        None => (
            format!(
                "SELECT {APPOINTMENT_COLUMNS} FROM appointments \
                 ORDER BY created_at DESC, rowid DESC LIMIT ?1"
            ),
            vec![Box::new(limit) as Box<dyn rusqlite::types::ToSql>],
        ),
    };

    let mut stmt = conn.prepare(&sql)?;
    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(params_refs.as_slice(), |row| Ok(parse_appointment_row(row)))?;

    let mut appointments = vec![];
    for row in rows {
        appointments.push(row??);
    }
    Ok(appointments)
}

pub fn get_appointment_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Appointment>> {
    let result = conn.query_row(
        &format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ?1"),
        params![id],
        |row| Ok(parse_appointment_row(row)),
    );

    match result {
        Ok(appt) => Ok(Some(appt?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn update_appointment_status(
    conn: &Connection,
    id: &str,
    status: AppointmentStatus,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE appointments SET status = ?1 WHERE id = ?2",
        params![status.as_str(), id],
    )?;
    Ok(count > 0)
}

fn parse_appointment_row(row: &rusqlite::Row) -> anyhow::Result<Appointment> {
    let id: String = row.get(0)?;
    let session_id: String = row.get(1)?;
    let name: String = row.get(2)?;
    let phone: String = row.get(3)?;
    let reason: String = row.get(4)?;
    let date_str: String = row.get(5)?;
    let time_str: String = row.get(6)?;
    let half_day_str: String = row.get(7)?;
    let status_str: String = row.get(8)?;
    let created_at_str: String = row.get(9)?;

    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")?;
    let time = NaiveTime::parse_from_str(&time_str, "%H:%M")?;
    let half_day = HalfDay::parse(&half_day_str)
        .ok_or_else(|| anyhow::anyhow!("invalid half_day in row {id}: {half_day_str}"))?;
    let created_at = NaiveDateTime::parse_from_str(&created_at_str, DATETIME_FMT)
        .unwrap_or_else(|_| Utc::now().naive_utc());

    Ok(Appointment {
        id,
        session_id,
        name,
        phone,
        reason,
        date,
        time,
        half_day,
        status: AppointmentStatus::parse(&status_str).unwrap_or(AppointmentStatus::Pending),
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    fn make_appt(id: &str, created_at: &str) -> Appointment {
        Appointment {
            id: id.to_string(),
            session_id: format!("session-{id}"),
            name: "Ana".to_string(),
            phone: "699123456".to_string(),
            reason: "dolor de muelas".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            half_day: HalfDay::Morning,
            status: AppointmentStatus::Confirmed,
            created_at: NaiveDateTime::parse_from_str(created_at, DATETIME_FMT).unwrap(),
        }
    }

    #[test]
    fn test_create_and_get() {
        let conn = setup_db();
        create_appointment(&conn, &make_appt("a1", "2025-06-01 09:00:00")).unwrap();

        let appt = get_appointment_by_id(&conn, "a1").unwrap().unwrap();
        assert_eq!(appt.name, "Ana");
        assert_eq!(appt.session_id, "session-a1");
        assert_eq!(appt.half_day, HalfDay::Morning);
        assert_eq!(appt.time, NaiveTime::from_hms_opt(10, 0, 0).unwrap());
        assert_eq!(appt.status, AppointmentStatus::Confirmed);

        assert!(get_appointment_by_id(&conn, "missing").unwrap().is_none());
    }

    #[test]
    fn test_list_newest_first() {
        let conn = setup_db();
        create_appointment(&conn, &make_appt("old", "2025-06-01 09:00:00")).unwrap();
        create_appointment(&conn, &make_appt("new", "2025-06-03 09:00:00")).unwrap();
        create_appointment(&conn, &make_appt("mid", "2025-06-02 09:00:00")).unwrap();

        let ids: Vec<String> = list_appointments(&conn, None, 50)
            .unwrap()
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_list_same_second_uses_insertion_order() {
        let conn = setup_db();
        create_appointment(&conn, &make_appt("first", "2025-06-01 09:00:00")).unwrap();
        create_appointment(&conn, &make_appt("second", "2025-06-01 09:00:00")).unwrap();

        let appts = list_appointments(&conn, None, 50).unwrap();
        assert_eq!(appts[0].id, "second");
    }

    #[test]
    fn test_list_status_filter_and_limit() {
        let conn = setup_db();
        create_appointment(&conn, &make_appt("a1", "2025-06-01 09:00:00")).unwrap();
        create_appointment(&conn, &make_appt("a2", "2025-06-02 09:00:00")).unwrap();
        create_appointment(&conn, &make_appt("a3", "2025-06-03 09:00:00")).unwrap();
        update_appointment_status(&conn, "a2", AppointmentStatus::Cancelled).unwrap();

        let cancelled = list_appointments(&conn, Some(AppointmentStatus::Cancelled), 50).unwrap();
        assert_eq!(cancelled.len(), 1);
        assert_eq!(cancelled[0].id, "a2");

        let limited = list_appointments(&conn, None, 2).unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(list_appointments(&conn, None, 50).unwrap().len(), 3);
    }

    #[test]
    fn test_update_missing_returns_false() {
        let conn = setup_db();
        assert!(!update_appointment_status(&conn, "nope", AppointmentStatus::Completed).unwrap());
    }
}
