use reachiq::outreach::signals::{LeadImportError, LeadImporter};

#[test]
fn sample_file_imports_with_clamped_signals() {
    let data = include_bytes!("../sample_leads.csv");
    let leads = LeadImporter::from_reader(&data[..]).expect("sample leads import");

    assert_eq!(leads.len(), 5);

    let acme = &leads[0];
    assert_eq!(acme.id.0, "BUY_2001");
    assert_eq!(acme.engagement.groups.as_deref(), Some("Automation Leaders"));
    assert_eq!(acme.channels[0].color, "#0A66C2");

    let lumen = &leads[4];
    assert_eq!(lumen.intent_score, 100.0);
    assert_eq!(lumen.engagement.linkedin_engagement, 1.0);
    assert!(lumen.engagement.groups.is_none());
    assert!(lumen.channels.is_empty());
}

#[test]
fn malformed_channel_entry_reports_line() {
    let csv = "buyer_id,name,industry,location,intent_score,linkedin_engagement,groups,previous_channel,channels\n\
BUY_1,One,SaaS,Remote,50,0.2,,,Email=40\n\
BUY_2,Two,SaaS,Remote,50,0.2,,,Email=lots\n";

    match LeadImporter::from_reader(csv.as_bytes()) {
        Err(LeadImportError::Row { line, message }) => {
            assert_eq!(line, 3);
            assert!(message.contains("non-numeric"));
        }
        other => panic!("expected row error, got {other:?}"),
    }
}

#[test]
fn duplicate_buyer_ids_are_rejected() {
    let csv = "buyer_id,name,industry,location,intent_score,linkedin_engagement,groups,previous_channel,channels\n\
BUY_1,One,SaaS,Remote,50,0.2,,,Email=40\n\
BUY_1,Again,SaaS,Remote,60,0.3,,,LinkedIn=70\n";

    let err = LeadImporter::from_reader(csv.as_bytes()).expect_err("duplicate rejected");
    assert!(err.to_string().contains("duplicate buyer_id 'BUY_1'"));
}

#[test]
fn non_numeric_scores_are_csv_errors() {
    let csv = "buyer_id,name,industry,location,intent_score,linkedin_engagement,groups,previous_channel,channels\n\
BUY_1,One,SaaS,Remote,high,0.2,,,Email=40\n";

    let err = LeadImporter::from_reader(csv.as_bytes()).expect_err("bad score rejected");
    assert!(matches!(err, LeadImportError::Csv(_)));
}
