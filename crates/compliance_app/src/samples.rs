//! Sample registries shown on the dashboard pages.

use compliance_docs::{Record, ReportKind};

/// id, title, effectiveDate, category, status, severity, description, lastUpdated
type RuleRow = (&'static str, &'static str, &'static str, &'static str, &'static str, &'static str, &'static str, &'static str);

const SEBI_RULES: &[RuleRow] = &[
    ("SEBI-001", "Margin Funding Requirements", "2024-08-01", "Risk Management", "Active", "High",
     "Updated margin requirements for retail investors with enhanced risk controls.", "2024-11-15"),
    ("SEBI-002", "Client Onboarding KYC Guidelines", "2024-06-15", "Compliance", "Active", "Medium",
     "Enhanced KYC procedures for new client registrations.", "2024-10-20"),
    ("SEBI-003", "Trade Reporting Standards", "2024-09-01", "Reporting", "Active", "High",
     "New real-time trade reporting requirements for all brokers.", "2024-11-30"),
    ("SEBI-004", "Digital Platform Security", "2024-07-01", "Technology", "Active", "Critical",
     "Mandatory cybersecurity measures for trading platforms.", "2024-11-10"),
    ("SEBI-005", "Investor Grievance Resolution", "2024-05-01", "Customer Protection", "Under Review", "Medium",
     "Streamlined process for handling investor complaints.", "2024-10-05"),
];

/// id, name, regNo, activeClients, complianceScore, lastAudit, status
type BrokerRow = (&'static str, &'static str, &'static str, i64, f64, &'static str, &'static str);

const BROKERS: &[BrokerRow] = &[
    ("ZER001", "Stocks_Analysis", "SEBI/123456/2020", 12_500_000, 96.5, "2024-11-15", "Active"),
    ("UPS001", "Ahuja_Sellers", "SEBI/789012/2019", 8_200_000, 94.2, "2024-10-28", "Active"),
    ("ANG001", "khurana_Enterprises", "SEBI/345678/2018", 6_800_000, 92.8, "2024-11-02", "Active"),
    ("GRW001", "Rare Enterprises", "SEBI/901234/2021", 4_500_000, 95.1, "2024-10-20", "Active"),
    ("ICI001", "Thapar", "SEBI/567890/2015", 3_200_000, 89.4, "2024-09-15", "Under Review"),
];

/// id, name, pan, brokerLinked, lastTradeDate, status, marginUsed, violations
type ClientRow = (&'static str, &'static str, &'static str, &'static str, &'static str, &'static str, &'static str, i64);

const CLIENTS: &[ClientRow] = &[
    ("CLI001", "Rajesh Kumar", "ABCDE1234F", "Zerodha", "2024-12-01", "Active", "₹2,45,000", 0),
    ("CLI002", "Priya Sharma", "FGHIJ5678K", "Upstox", "2024-11-28", "Active", "₹1,80,500", 1),
    ("CLI003", "Arjun Patel", "KLMNO9012P", "Angel One", "2024-11-30", "Suspended", "₹5,20,000", 3),
    ("CLI004", "Sneha Reddy", "QRSTU3456V", "Groww", "2024-12-01", "Active", "₹95,750", 0),
    ("CLI005", "Vikram Singh", "WXYZ7890A", "ICICI Direct", "2024-11-25", "Under Review", "₹3,15,200", 2),
];

/// brokerName, feesCollected, month, status, percentage, growth
type FeeRow = (&'static str, i64, &'static str, &'static str, f64, &'static str);

const BROKER_FEES: &[FeeRow] = &[
    ("Zerodha", 2_450_000, "December 2024", "Paid", 35.2, "+12.5%"),
    ("Upstox", 1_850_000, "December 2024", "Paid", 26.6, "+8.3%"),
    ("Angel One", 1_320_000, "December 2024", "Pending", 19.0, "+15.7%"),
    ("Groww", 980_000, "December 2024", "Paid", 14.1, "+22.1%"),
    ("ICICI Direct", 350_000, "December 2024", "Overdue", 5.0, "-3.2%"),
];

/// id, type, broker, severity, message, date, status, priority
type AlertRow = (&'static str, &'static str, &'static str, &'static str, &'static str, &'static str, &'static str, &'static str);

const ALERTS: &[AlertRow] = &[
    ("ALT001", "Rule Violation", "ICICI Direct", "Critical",
     "Margin limit exceeded by 25% for client CLI003", "2024-12-01T14:30:00", "Open", "High"),
    ("ALT002", "Broker Suspended", "Delta Securities", "Critical",
     "Trading privileges suspended due to non-compliance", "2024-12-01T12:15:00", "Acknowledged", "Critical"),
    ("ALT003", "Missing File Submission", "Angel One", "Warning",
     "Monthly compliance report overdue by 2 days", "2024-12-01T09:45:00", "Open", "Medium"),
    ("ALT004", "System Alert", "Zerodha", "Info",
     "Unusual trading volume detected - automated review triggered", "2024-12-01T08:20:00", "Resolved", "Low"),
    ("ALT005", "KYC Violation", "Upstox", "Warning",
     "Client KYC documentation incomplete for 15 accounts", "2024-11-30T16:30:00", "In Progress", "Medium"),
    ("ALT006", "Audit Finding", "Groww", "Warning",
     "Minor discrepancy found in trade settlement records", "2024-11-30T14:10:00", "Open", "Medium"),
];

/// The sample records behind a report.
pub fn records_for(kind: ReportKind) -> Vec<Record> {
    match kind {
        ReportKind::SebiRules => SEBI_RULES
            .iter()
            .map(|&(id, title, effective, category, status, severity, description, updated)| {
                Record::new()
                    .with("id", id)
                    .with("title", title)
                    .with("effectiveDate", effective)
                    .with("category", category)
                    .with("status", status)
                    .with("severity", severity)
                    .with("description", description)
                    .with("lastUpdated", updated)
            })
            .collect(),
        ReportKind::BrokerDetails => BROKERS
            .iter()
            .map(|&(id, name, reg_no, clients, score, audit, status)| {
                Record::new()
                    .with("id", id)
                    .with("name", name)
                    .with("regNo", reg_no)
                    .with("activeClients", clients)
                    .with("complianceScore", score)
                    .with("lastAudit", audit)
                    .with("status", status)
            })
            .collect(),
        ReportKind::ClientReports => CLIENTS
            .iter()
            .map(|&(id, name, pan, broker, last_trade, status, margin, violations)| {
                Record::new()
                    .with("id", id)
                    .with("name", name)
                    .with("pan", pan)
                    .with("brokerLinked", broker)
                    .with("lastTradeDate", last_trade)
                    .with("status", status)
                    .with("marginUsed", margin)
                    .with("violations", violations)
            })
            .collect(),
        ReportKind::FeesCollected => BROKER_FEES
            .iter()
            .map(|&(broker, fees, month, status, percentage, growth)| {
                Record::new()
                    .with("brokerName", broker)
                    .with("feesCollected", fees)
                    .with("month", month)
                    .with("status", status)
                    .with("percentage", percentage)
                    .with("growth", growth)
            })
            .collect(),
        ReportKind::Alerts => ALERTS
            .iter()
            .map(|&(id, kind, broker, severity, message, date, status, priority)| {
                Record::new()
                    .with("id", id)
                    .with("type", kind)
                    .with("broker", broker)
                    .with("severity", severity)
                    .with("message", message)
                    .with("date", date)
                    .with("status", status)
                    .with("priority", priority)
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_report_has_uniform_records() {
        for kind in ReportKind::ALL {
            let records = records_for(kind);
            assert!(!records.is_empty(), "{kind:?} has no sample data");
            let first: Vec<&str> = records[0].keys().collect();
            for record in &records {
                assert_eq!(record.keys().collect::<Vec<_>>(), first);
            }
        }
    }

    #[test]
    fn broker_sample_keeps_numeric_types() {
        let records = records_for(ReportKind::BrokerDetails);
        assert_eq!(
            records[0].get("activeClients"),
            Some(&compliance_docs::Value::Integer(12_500_000))
        );
        assert_eq!(
            records[0].get("complianceScore"),
            Some(&compliance_docs::Value::Float(96.5))
        );
    }
}
