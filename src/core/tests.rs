#[cfg(test)]
mod tests_impl {
    use crate::core::builder::RuleBuilder;
    use crate::core::error::Error;
    use crate::core::request::{RuleRequest, render_all};
    use crate::core::rule::{Action, EnumField};

    #[test]
    fn test_end_to_end_https_rule() {
        let mut fw = RuleBuilder::new();
        fw.reset()
            .table("filter")
            .unwrap()
            .chain("INPUT")
            .unwrap()
            .protocol("TCP")
            .unwrap()
            .action("accept")
            .unwrap()
            .dest_port(443)
            .unwrap();

        assert_eq!(
            fw.build().unwrap(),
            "iptables -t filter -A INPUT -p tcp -j ACCEPT --dport 443"
        );
    }

    #[test]
    fn test_failed_setter_mid_chain_keeps_earlier_tokens() {
        let mut fw = RuleBuilder::new();
        let result = fw
            .reset()
            .chain("INPUT")
            .and_then(|b| b.source_ip("300.1.1.1"))
            .and_then(|b| b.action("drop"));

        assert!(matches!(result, Err(Error::InvalidAddress { .. })));
        assert_eq!(fw.tokens(), ["-A INPUT"]);
    }

    #[test]
    fn test_builder_reuse_across_rules() {
        let mut fw = RuleBuilder::new();

        fw.reset().chain("INPUT").unwrap().action("drop").unwrap();
        let first = fw.build().unwrap();

        fw.reset().chain("OUTPUT").unwrap().action("log").unwrap();
        let second = fw.build().unwrap();

        assert_eq!(first, "iptables -A INPUT -j DROP");
        assert_eq!(second, "iptables -A OUTPUT -j LOG");
    }

    #[test]
    fn test_log_action_and_log_clause_coexist() {
        // The LOG target can be chosen as the action and again via the log clause
        let mut request = RuleRequest::new("FORWARD", "all", Action::Log.as_str());
        request.log_prefix = Some("FWD".to_string());
        request.log_level = 7;

        let rule = request.render(&mut RuleBuilder::new()).unwrap();
        assert_eq!(
            rule.command,
            "iptables -t filter -A FORWARD -p all -j LOG -j LOG --log-prefix \"FWD: \" --log-level 7"
        );
    }

    #[test]
    fn test_batch_renders_each_rule_independently() {
        let requests: Vec<RuleRequest> = serde_json::from_str(
            r#"[
                {"chain": "INPUT", "protocol": "tcp", "action": "accept", "dest_port": 22,
                 "state": "NEW,ESTABLISHED", "comment": "ssh"},
                {"table": "raw", "chain": "PREROUTING", "protocol": "udp", "action": "drop",
                 "source_ip": "2001:db8::1"}
            ]"#,
        )
        .unwrap();

        let rules = render_all(&requests).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(
            rules[0].command,
            "iptables -t filter -A INPUT -p tcp -j ACCEPT --dport 22 \
             -m comment --comment \"ssh\" -m conntrack --ctstate NEW,ESTABLISHED"
        );
        assert_eq!(
            rules[1].command,
            "iptables -t raw -A PREROUTING -p udp -j DROP -s 2001:db8::1"
        );
    }

    #[test]
    fn test_batch_table_typo_is_reported() {
        let requests = vec![RuleRequest {
            table: "Filter".to_string(),
            ..RuleRequest::new("INPUT", "tcp", "accept")
        }];

        let err = render_all(&requests).unwrap_err();
        let Error::Batch { index, source } = err else {
            panic!("expected batch error");
        };
        assert_eq!(index, 0);
        assert!(matches!(
            *source,
            Error::InvalidEnumValue {
                field: EnumField::Table,
                ..
            }
        ));
    }

    #[test]
    fn test_rendered_rule_json_shape() {
        let mut fw = RuleBuilder::new();
        fw.chain("INPUT").unwrap().comment("x");
        let json = serde_json::to_value(fw.render().unwrap()).unwrap();
        assert_eq!(json["command"], "iptables -A INPUT -m comment --comment \"x\"");
        assert_eq!(json["tokens"][1], "-m comment --comment \"x\"");
    }
}

#[cfg(test)]
mod property_tests {
    use crate::core::builder::RuleBuilder;
    use proptest::prelude::*;

    /// One setter call with arbitrary input
    #[derive(Debug, Clone)]
    enum Call {
        Table(String),
        Chain(String),
        Action(String),
        Protocol(String),
        SourceIp(String),
        DestPort(i64),
        Comment(String),
        State(String),
        Log(String, i64),
    }

    fn call_strategy() -> impl Strategy<Value = Call> {
        let word = "[a-zA-Z0-9.:\" ]{0,12}";
        prop_oneof![
            prop_oneof![Just("filter".to_string()), word].prop_map(Call::Table),
            prop_oneof![Just("INPUT".to_string()), word].prop_map(Call::Chain),
            prop_oneof![Just("drop".to_string()), word].prop_map(Call::Action),
            prop_oneof![Just("TCP".to_string()), word].prop_map(Call::Protocol),
            prop_oneof![Just("10.0.0.1".to_string()), word].prop_map(Call::SourceIp),
            (-10i64..70_000).prop_map(Call::DestPort),
            word.prop_map(Call::Comment),
            word.prop_map(Call::State),
            (word, -2i64..10).prop_map(|(p, l)| Call::Log(p, l)),
        ]
    }

    fn apply(fw: &mut RuleBuilder, call: &Call) -> bool {
        match call {
            Call::Table(v) => fw.table(v).is_ok(),
            Call::Chain(v) => fw.chain(v).is_ok(),
            Call::Action(v) => fw.action(v).is_ok(),
            Call::Protocol(v) => fw.protocol(v).is_ok(),
            Call::SourceIp(v) => fw.source_ip(v).is_ok(),
            Call::DestPort(v) => fw.dest_port(*v).is_ok(),
            Call::Comment(v) => {
                fw.comment(v);
                true
            }
            Call::State(v) => fw.state(v).is_ok(),
            Call::Log(p, l) => fw.log(p, *l).is_ok(),
        }
    }

    proptest! {
        #[test]
        fn test_each_call_appends_one_token_or_nothing(calls in prop::collection::vec(call_strategy(), 0..20)) {
            let mut fw = RuleBuilder::new();
            let mut expected_len = 0;
            for call in &calls {
                let before = fw.tokens().to_vec();
                if apply(&mut fw, call) {
                    expected_len += 1;
                    prop_assert_eq!(&fw.tokens()[..before.len()], &before[..]);
                } else {
                    prop_assert_eq!(fw.tokens(), &before[..]);
                }
                prop_assert_eq!(fw.tokens().len(), expected_len);
            }

            match fw.build() {
                Ok(command) => {
                    prop_assert!(expected_len > 0);
                    prop_assert_eq!(command, format!("iptables {}", fw.tokens().join(" ")));
                }
                Err(_) => prop_assert_eq!(expected_len, 0),
            }
        }
    }
}
