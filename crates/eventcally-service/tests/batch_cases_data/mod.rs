use chrono::TimeZone;

pub struct BatchCase {
    pub name: &'static str,
    pub rule: &'static str,
    pub start: usize,
    pub expected_len: usize,
    pub first_date: &'static str,
    pub first_formatted: &'static str,
    pub kinds: Option<&'static [OccurrenceType]>,
    pub batch_start: usize,
    pub end: usize,
    pub batches: usize,
    pub current_batch: usize,
}

pub const BATCH_FORMAT: &str = "\"%d.%m.%Y\"";
pub const BATCH_SIZE: usize = 10;

pub fn batch_anchor() -> chrono::DateTime<chrono_tz::Tz> {
    chrono_tz::Europe::Berlin
        .with_ymd_and_hms(2030, 1, 1, 0, 0, 0)
        .unwrap()
}

#[expect(clippy::too_many_lines)]
pub fn batch_cases() -> Vec<BatchCase> {
    vec![
        BatchCase {
            name: "count_seven",
            rule: "RRULE:FREQ=DAILY;COUNT=7",
            start: 0,
            expected_len: 7,
            first_date: "20300101T000000",
            first_formatted: "\"01.01.2030\"",
            kinds: Some(&[
                OccurrenceType::Start,
                OccurrenceType::Rrule,
                OccurrenceType::Rrule,
                OccurrenceType::Rrule,
                OccurrenceType::Rrule,
                OccurrenceType::Rrule,
                OccurrenceType::Rrule,
            ]),
            batch_start: 0,
            end: 7,
            batches: 1,
            current_batch: 0,
        },
        BatchCase {
            name: "exdate_after_last_date",
            rule: "RRULE:FREQ=DAILY;COUNT=2\nEXDATE:20300102T000000",
            start: 0,
            expected_len: 2,
            first_date: "20300101T000000",
            first_formatted: "\"01.01.2030\"",
            kinds: Some(&[OccurrenceType::Start, OccurrenceType::Exdate]),
            batch_start: 0,
            end: 2,
            batches: 1,
            current_batch: 0,
        },
        BatchCase {
            name: "exdate_between_dates",
            rule: "RRULE:FREQ=DAILY;COUNT=2\nEXDATE:20300102\nRDATE:20300103",
            start: 0,
            expected_len: 3,
            first_date: "20300101T000000",
            first_formatted: "\"01.01.2030\"",
            kinds: Some(&[
                OccurrenceType::Start,
                OccurrenceType::Exdate,
                OccurrenceType::Rdate,
            ]),
            batch_start: 0,
            end: 3,
            batches: 1,
            current_batch: 0,
        },
        BatchCase {
            name: "second_batch_after_exdate",
            rule: "RRULE:FREQ=DAILY;COUNT=20\nEXDATE:20300102",
            start: 10,
            expected_len: 10,
            first_date: "20300111T000000",
            first_formatted: "\"11.01.2030\"",
            kinds: None,
            batch_start: 10,
            end: 20,
            batches: 2,
            current_batch: 1,
        },
        BatchCase {
            name: "exdate_before_anchor",
            rule: "RRULE:FREQ=DAILY;COUNT=20\nEXDATE:20290102",
            start: 10,
            expected_len: 10,
            first_date: "20300110T000000",
            first_formatted: "\"10.01.2030\"",
            kinds: None,
            batch_start: 10,
            end: 21,
            batches: 3,
            current_batch: 1,
        },
        BatchCase {
            name: "unbounded_first_batch",
            rule: "RRULE:FREQ=DAILY",
            start: 0,
            expected_len: 10,
            first_date: "20300101T000000",
            first_formatted: "\"01.01.2030\"",
            kinds: None,
            batch_start: 0,
            end: 70,
            batches: 7,
            current_batch: 0,
        },
        BatchCase {
            name: "count_beyond_navigation",
            rule: "RRULE:FREQ=DAILY;COUNT=100",
            start: 0,
            expected_len: 10,
            first_date: "20300101T000000",
            first_formatted: "\"01.01.2030\"",
            kinds: None,
            batch_start: 0,
            end: 70,
            batches: 7,
            current_batch: 0,
        },
        BatchCase {
            name: "unbounded_unaligned_start",
            rule: "RRULE:FREQ=DAILY",
            start: 45,
            expected_len: 10,
            first_date: "20300210T000000",
            first_formatted: "\"10.02.2030\"",
            kinds: None,
            batch_start: 40,
            end: 80,
            batches: 7,
            current_batch: 3,
        },
        BatchCase {
            name: "start_past_last_batch",
            rule: "RRULE:FREQ=DAILY;COUNT=7",
            start: 30,
            expected_len: 7,
            first_date: "20300101T000000",
            first_formatted: "\"01.01.2030\"",
            kinds: None,
            batch_start: 0,
            end: 7,
            batches: 1,
            current_batch: 0,
        },
        BatchCase {
            name: "rdates_only",
            rule: "RDATE:20300103,20300105",
            start: 0,
            expected_len: 2,
            first_date: "20300103T000000",
            first_formatted: "\"03.01.2030\"",
            kinds: Some(&[OccurrenceType::Rdate, OccurrenceType::Rdate]),
            batch_start: 0,
            end: 2,
            batches: 1,
            current_batch: 0,
        },
    ]
}

pub fn assert_batch_case(case: &BatchCase) {
    let result = calculate_batch(&batch_anchor(), BATCH_FORMAT, case.rule, case.start, BATCH_SIZE)
        .unwrap_or_else(|err| panic!("{}: {err}", case.name));

    assert_eq!(result.occurrences.len(), case.expected_len, "{}", case.name);
    let first = &result.occurrences[0];
    assert_eq!(first.date, case.first_date, "{}", case.name);
    assert_eq!(first.formatted_date, case.first_formatted, "{}", case.name);

    if let Some(kinds) = case.kinds {
        let actual: Vec<OccurrenceType> = result.occurrences.iter().map(|o| o.kind).collect();
        assert_eq!(actual, kinds, "{}", case.name);
    }

    assert_eq!(result.batch.start, case.batch_start, "{}", case.name);
    assert_eq!(result.batch.end, case.end, "{}", case.name);
    assert_eq!(result.batch.batch_size, BATCH_SIZE, "{}", case.name);
    assert_eq!(result.batch.batches.len(), case.batches, "{}", case.name);
    assert_eq!(result.batch.current_batch, case.current_batch, "{}", case.name);

    let (current_from, current_to) = result.batch.batches[case.current_batch];
    assert_eq!(current_from, case.batch_start + 1, "{}", case.name);
    assert_eq!(current_to, case.batch_start + BATCH_SIZE, "{}", case.name);
}

/// Rules whose exclusions sit inside the rule, on page edges and after its end.
pub fn paging_rules() -> &'static [&'static str] {
    &[
        "RRULE:FREQ=DAILY;COUNT=12\nEXDATE:20300103T000000,20300104T000000",
        "RRULE:FREQ=DAILY;COUNT=10\nEXDATE:20300104T000000",
        "RRULE:FREQ=DAILY;COUNT=4\nEXDATE:20300110T000000,20300112T000000\nRDATE:20300107T000000",
        "RRULE:FREQ=WEEKLY;COUNT=6\nEXDATE:20291225T000000,20300108T000000",
    ]
}

/// Pages of several sizes, walked from the first index, must list the same
/// entries as a single batch holding everything.
pub fn assert_paging_consistent(rule: &str) {
    let everything = calculate_batch(&batch_anchor(), BATCH_FORMAT, rule, 0, 1000)
        .unwrap_or_else(|err| panic!("{rule}: {err}"));
    assert_eq!(everything.batch.end, everything.occurrences.len(), "{rule}");

    for size in [1, 3, 10] {
        let mut paged = Vec::new();
        let mut start = 0;
        while start < everything.occurrences.len() {
            let page = calculate_batch(&batch_anchor(), BATCH_FORMAT, rule, start, size)
                .unwrap_or_else(|err| panic!("{rule} @ {start}/{size}: {err}"));
            assert_eq!(page.batch.start, start, "{rule} @ {start}/{size}");
            paged.extend(page.occurrences);
            start += size;
        }
        assert_eq!(paged, everything.occurrences, "{rule} in pages of {size}");
    }
}
