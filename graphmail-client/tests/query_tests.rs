use chrono::NaiveDate;
use graphmail_client::MessageQuery;
use graphmail_filter::FilterOperator;
use pretty_assertions::assert_eq;

#[test]
fn empty_query_has_no_filter() {
    assert!(MessageQuery::default().to_filter().unwrap().is_none());
}

#[test]
fn single_condition_stays_bare() {
    let query = MessageQuery {
        unread_only: true,
        ..Default::default()
    };
    let filter = query.to_filter().unwrap().unwrap();
    assert_eq!(filter.operator(), FilterOperator::Eq);
    assert_eq!(filter.query().unwrap(), "$filter=IsRead eq false");
}

#[test]
fn conditions_are_joined_with_and() {
    let query = MessageQuery {
        unread_only: true,
        from: Some("Alice Smith".to_string()),
        since: NaiveDate::from_ymd_opt(2024, 1, 15),
    };
    let filter = query.to_filter().unwrap().unwrap();
    assert_eq!(filter.operator(), FilterOperator::And);
    assert_eq!(
        filter.query().unwrap(),
        "$filter=IsRead eq false and From/EmailAddress/Name eq 'Alice Smith' and ReceivedDateTime ge 2024-01-15T00:00:00"
    );
}

#[test]
fn sender_address_uses_address_path() {
    let query = MessageQuery {
        from: Some("alice@contoso.com".to_string()),
        ..Default::default()
    };
    assert_eq!(
        query.to_filter().unwrap().unwrap().fragment().unwrap(),
        "From/EmailAddress/Address eq 'alice@contoso.com'"
    );
}
