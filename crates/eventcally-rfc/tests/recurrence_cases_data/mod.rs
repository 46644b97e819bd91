use chrono::NaiveDateTime;
use chrono_tz::America::New_York;
use chrono_tz::Europe::Berlin;
use eventcally_core::constants::DATE_COMPACT_FORMAT;

/// Upper bound passed to `RRuleSet::all` for every case.
pub const CASE_LIMIT: u16 = 400;

pub enum Expected {
    /// Every generated date, as RFC 3339 in the anchor's zone.
    Dates(&'static [&'static str]),
    Count(usize),
}

pub struct RecurrenceCase {
    pub name: &'static str,
    pub zone: chrono_tz::Tz,
    /// Wall-clock anchor in `zone`, `YYYYMMDDTHHMMSS`.
    pub anchor: &'static str,
    pub rule: &'static str,
    pub expected: Expected,
}

#[expect(clippy::too_many_lines)]
pub fn recurrence_cases() -> Vec<RecurrenceCase> {
    vec![
        RecurrenceCase {
            name: "daily_count_from_midnight",
            zone: Berlin,
            anchor: "20300101T000000",
            rule: "RRULE:FREQ=DAILY;COUNT=3",
            expected: Expected::Dates(&[
                "2030-01-01T00:00:00+01:00",
                "2030-01-02T00:00:00+01:00",
                "2030-01-03T00:00:00+01:00",
            ]),
        },
        RecurrenceCase {
            name: "widget_exdate_and_rdate",
            zone: Berlin,
            anchor: "20300101T000000",
            rule: "RRULE:FREQ=DAILY;COUNT=2\nEXDATE:20300102T000000\nRDATE:20300103T000000",
            expected: Expected::Dates(&["2030-01-01T00:00:00+01:00", "2030-01-03T00:00:00+01:00"]),
        },
        RecurrenceCase {
            name: "floating_until_read_in_anchor_zone",
            zone: Berlin,
            anchor: "20300108T120000",
            rule: "RRULE:FREQ=DAILY;UNTIL=20300110T120000",
            expected: Expected::Dates(&[
                "2030-01-08T12:00:00+01:00",
                "2030-01-09T12:00:00+01:00",
                "2030-01-10T12:00:00+01:00",
            ]),
        },
        RecurrenceCase {
            name: "date_only_until_covers_the_day",
            zone: Berlin,
            anchor: "20300108T143000",
            rule: "RRULE:FREQ=DAILY;UNTIL=20300110",
            expected: Expected::Dates(&[
                "2030-01-08T14:30:00+01:00",
                "2030-01-09T14:30:00+01:00",
                "2030-01-10T14:30:00+01:00",
            ]),
        },
        RecurrenceCase {
            name: "value_date_lists",
            zone: Berlin,
            anchor: "20300101T000000",
            rule: "RRULE:FREQ=DAILY;COUNT=3\nEXDATE;VALUE=DATE:20300102\nRDATE;VALUE=DATE:20300105,20300107",
            expected: Expected::Dates(&[
                "2030-01-01T00:00:00+01:00",
                "2030-01-03T00:00:00+01:00",
                "2030-01-05T00:00:00+01:00",
                "2030-01-07T00:00:00+01:00",
            ]),
        },
        RecurrenceCase {
            name: "tzid_exdate_matches_same_instant",
            zone: Berlin,
            anchor: "20300101T100000",
            rule: "RRULE:FREQ=DAILY;COUNT=3\nEXDATE;TZID=America/New_York:20300102T040000",
            expected: Expected::Dates(&["2030-01-01T10:00:00+01:00", "2030-01-03T10:00:00+01:00"]),
        },
        RecurrenceCase {
            name: "utc_rdate_between_weeks",
            zone: Berlin,
            anchor: "20300101T100000",
            rule: "RRULE:FREQ=WEEKLY;COUNT=2\nRDATE:20300103T090000Z",
            expected: Expected::Dates(&[
                "2030-01-01T10:00:00+01:00",
                "2030-01-03T10:00:00+01:00",
                "2030-01-08T10:00:00+01:00",
            ]),
        },
        RecurrenceCase {
            name: "berlin_spring_forward_keeps_wall_clock",
            zone: Berlin,
            anchor: "20300330T143000",
            rule: "RRULE:FREQ=DAILY;COUNT=3",
            expected: Expected::Dates(&[
                "2030-03-30T14:30:00+01:00",
                "2030-03-31T14:30:00+02:00",
                "2030-04-01T14:30:00+02:00",
            ]),
        },
        RecurrenceCase {
            name: "new_york_fall_back_keeps_wall_clock",
            zone: New_York,
            anchor: "20301102T190000",
            rule: "RRULE:FREQ=DAILY;COUNT=2",
            expected: Expected::Dates(&["2030-11-02T19:00:00-04:00", "2030-11-03T19:00:00-05:00"]),
        },
        RecurrenceCase {
            name: "weekly_byday_across_new_year",
            zone: Berlin,
            anchor: "20301230T183000",
            rule: "RRULE:FREQ=WEEKLY;BYDAY=MO,WE;COUNT=4",
            expected: Expected::Dates(&[
                "2030-12-30T18:30:00+01:00",
                "2031-01-01T18:30:00+01:00",
                "2031-01-06T18:30:00+01:00",
                "2031-01-08T18:30:00+01:00",
            ]),
        },
        RecurrenceCase {
            name: "monthly_on_31st_skips_short_months",
            zone: Berlin,
            anchor: "20300131T090000",
            rule: "RRULE:FREQ=MONTHLY;COUNT=3",
            expected: Expected::Dates(&[
                "2030-01-31T09:00:00+01:00",
                "2030-03-31T09:00:00+02:00",
                "2030-05-31T09:00:00+02:00",
            ]),
        },
        RecurrenceCase {
            name: "yearly_on_leap_day",
            zone: Berlin,
            anchor: "20280229T120000",
            rule: "RRULE:FREQ=YEARLY;COUNT=2",
            expected: Expected::Dates(&["2028-02-29T12:00:00+01:00", "2032-02-29T12:00:00+01:00"]),
        },
        RecurrenceCase {
            name: "unbounded_rule_stops_at_limit",
            zone: Berlin,
            anchor: "20300101T000000",
            rule: "RRULE:FREQ=DAILY",
            expected: Expected::Count(usize::from(CASE_LIMIT)),
        },
    ]
}

pub fn check_case(case: &RecurrenceCase) {
    let local = NaiveDateTime::parse_from_str(case.anchor, DATE_COMPACT_FORMAT)
        .unwrap_or_else(|err| panic!("{}: bad anchor: {err}", case.name));
    let anchor = localize(&case.zone, local);

    let dates: Vec<String> = parse_recurrence_rule(case.rule)
        .and_then(|rule| rule.build(&anchor))
        .unwrap_or_else(|err| panic!("{}: {err}", case.name))
        .all(CASE_LIMIT)
        .dates
        .iter()
        .map(|date| date.with_timezone(&case.zone).to_rfc3339())
        .collect();

    match case.expected {
        Expected::Dates(expected) => assert_eq!(dates, expected, "{}", case.name),
        Expected::Count(count) => assert_eq!(dates.len(), count, "{}", case.name),
    }
}
