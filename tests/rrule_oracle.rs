// Cross-check against the rrule crate
// Only rules whose start date satisfies the rule are compared, since the
// calculator always lists the start date and rrule does not.

mod fixtures;

use pretty_assertions::assert_eq;
use test_case::test_case;

use fixtures::{dates, expand};

fn oracle(rule: &str) -> Vec<String> {
    let set: rrule::RRuleSet = format!("DTSTART:19970902T090000Z\nRRULE:{}", rule)
        .parse()
        .unwrap();

    set.all(1000)
        .dates
        .iter()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .collect()
}

#[test_case("FREQ=DAILY;COUNT=10"; "daily")]
#[test_case("FREQ=DAILY;INTERVAL=2;COUNT=12"; "every other day")]
#[test_case("FREQ=WEEKLY;COUNT=10"; "weekly")]
#[test_case("FREQ=WEEKLY;INTERVAL=2;WKST=SU;COUNT=10"; "every other week")]
#[test_case("FREQ=WEEKLY;BYDAY=TU,TH;COUNT=10"; "tuesday and thursday")]
#[test_case("FREQ=WEEKLY;UNTIL=19971007T000000Z;WKST=SU;BYDAY=TU,TH"; "weekly until")]
#[test_case("FREQ=MONTHLY;COUNT=10"; "monthly on start day")]
#[test_case("FREQ=MONTHLY;COUNT=10;BYMONTHDAY=2,15"; "second and fifteenth")]
#[test_case("FREQ=MONTHLY;INTERVAL=2;BYDAY=TU;UNTIL=19980331T235959Z"; "tuesdays every other month")]
#[test_case("FREQ=MONTHLY;BYDAY=1TU;COUNT=8"; "first tuesday")]
#[test_case("FREQ=YEARLY;COUNT=5"; "yearly")]
#[test_case("FREQ=YEARLY;COUNT=10;BYMONTH=9,10"; "yearly in two months")]
#[test_case("FREQ=DAILY;UNTIL=19971224T000000Z;BYMONTH=9,11"; "daily in selected months")]
fn test_matches_rrule_crate(rule: &str) {
    let ours = expand(rule, dates::rfc_start(), None);
    assert!(!ours.is_empty());
    assert_eq!(ours, oracle(rule));
}
