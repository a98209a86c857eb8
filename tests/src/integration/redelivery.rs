//! # Oracle Redelivery
//!
//! Oracle networks may deliver a response more than once, late, or for a
//! request that was superseded. Each request id is consumed once and a
//! proposal's commitments never change after they are first stored.

#[cfg(test)]
mod tests {
    use super::super::harness::*;
    use commitment_gate::{
        call_hash, encode_commitments, Address, CommitOutcome, ExecutionGateApi, GateError,
        GateEvent, Operation, OracleResponse, ProposalCall, ProposalId, ProposalStatus,
        RequestId, U256,
    };

    fn call(tag: u8) -> ProposalCall {
        ProposalCall::new(TARGET, U256::zero(), vec![tag], Operation::Direct)
    }

    fn payload_for(tag: u8) -> OracleResponse {
        OracleResponse::Result(encode_commitments(&[call_hash(&call(tag))]))
    }

    #[tokio::test]
    async fn test_redelivered_result_is_duplicate() {
        let bridge = Bridge::new(0);
        let id = ProposalId::new("p1");
        let request_id = bridge.gate.begin_resolution(&id).await.unwrap();

        assert!(matches!(
            bridge.gate.fulfill(ORACLE, request_id, payload_for(1)),
            Ok(CommitOutcome::Stored { count: 1, .. })
        ));
        assert_eq!(
            bridge.gate.fulfill(ORACLE, request_id, payload_for(2)),
            Ok(CommitOutcome::Duplicate {
                proposal_id: id.clone()
            })
        );

        assert_eq!(bridge.gate.registry().commitments(&id), vec![call_hash(&call(1))]);
        assert_eq!(bridge.gate.stats().resolutions_fulfilled, 1);
        let stored = bridge
            .observer
            .events()
            .iter()
            .filter(|e| matches!(e, GateEvent::CommitmentsStored { .. }))
            .count();
        assert_eq!(stored, 1);
    }

    #[tokio::test]
    async fn test_redelivered_error_after_result_is_duplicate() {
        let bridge = Bridge::new(0);
        let id = ProposalId::new("p1");
        let request_id = bridge.gate.begin_resolution(&id).await.unwrap();

        bridge
            .gate
            .fulfill(ORACLE, request_id, payload_for(1))
            .unwrap();
        assert!(matches!(
            bridge
                .gate
                .fulfill(ORACLE, request_id, OracleResponse::Error(b"late".to_vec())),
            Ok(CommitOutcome::Duplicate { .. })
        ));
        assert_eq!(bridge.gate.status(&id), ProposalStatus::Committed);
    }

    #[tokio::test]
    async fn test_later_request_cannot_overwrite_commitments() {
        let bridge = Bridge::new(0);
        let id = ProposalId::new("p1");

        let first = bridge.gate.begin_resolution(&id).await.unwrap();
        bridge.gate.fulfill(ORACLE, first, payload_for(1)).unwrap();

        let second = bridge.gate.begin_resolution(&id).await.unwrap();
        assert_eq!(
            bridge.gate.fulfill(ORACLE, second, payload_for(2)),
            Ok(CommitOutcome::AlreadyCommitted {
                proposal_id: id.clone()
            })
        );
        assert_eq!(bridge.gate.registry().commitments(&id), vec![call_hash(&call(1))]);

        assert!(matches!(
            bridge.gate.execute_proposal(&id, call(2)).await,
            Err(GateError::HashMismatch { .. })
        ));
        bridge.gate.execute_proposal(&id, call(1)).await.unwrap();
    }

    #[tokio::test]
    async fn test_out_of_order_delivery_first_result_wins() {
        let bridge = Bridge::new(0);
        let id = ProposalId::new("p1");

        let older = bridge.gate.begin_resolution(&id).await.unwrap();
        let newer = bridge.gate.begin_resolution(&id).await.unwrap();
        assert_ne!(older, newer);
        assert_eq!(bridge.gate.registry().proposal_for(&older), Some(id.clone()));
        assert_eq!(bridge.gate.registry().proposal_for(&newer), Some(id.clone()));

        bridge.gate.fulfill(ORACLE, newer, payload_for(2)).unwrap();
        assert!(matches!(
            bridge.gate.fulfill(ORACLE, older, payload_for(1)),
            Ok(CommitOutcome::AlreadyCommitted { .. })
        ));
        assert_eq!(bridge.gate.registry().commitments(&id), vec![call_hash(&call(2))]);
    }

    #[tokio::test]
    async fn test_unknown_request_rejected() {
        let bridge = Bridge::new(0);
        let stray = RequestId::random();

        assert_eq!(
            bridge.gate.fulfill(ORACLE, stray, payload_for(1)),
            Err(GateError::UnknownRequest(stray))
        );
    }

    #[tokio::test]
    async fn test_requests_are_scoped_to_their_proposal() {
        let bridge = Bridge::new(0);
        let a = ProposalId::new("a");
        let b = ProposalId::new("b");

        let request_a = bridge.gate.begin_resolution(&a).await.unwrap();
        let request_b = bridge.gate.begin_resolution(&b).await.unwrap();

        bridge.gate.fulfill(ORACLE, request_b, payload_for(2)).unwrap();
        assert_eq!(bridge.gate.status(&a), ProposalStatus::AwaitingResolution);
        assert!(bridge.gate.registry().commitments(&a).is_empty());

        bridge.gate.fulfill(ORACLE, request_a, payload_for(1)).unwrap();
        assert_eq!(bridge.gate.registry().commitments(&a), vec![call_hash(&call(1))]);
        assert_eq!(bridge.gate.registry().commitments(&b), vec![call_hash(&call(2))]);
    }

    #[tokio::test]
    async fn test_trailing_partial_word_dropped() {
        let bridge = Bridge::new(0);
        let id = ProposalId::new("p1");
        let request_id = bridge.gate.begin_resolution(&id).await.unwrap();

        let mut payload = encode_commitments(&[call_hash(&call(1))]);
        payload.extend_from_slice(&[0xFF; 18]);
        assert!(matches!(
            bridge
                .gate
                .fulfill(ORACLE, request_id, OracleResponse::Result(payload)),
            Ok(CommitOutcome::Stored { count: 1, .. })
        ));
        assert_eq!(bridge.gate.registry().commitments(&id), vec![call_hash(&call(1))]);
    }

    #[tokio::test]
    async fn test_rotated_oracle() {
        let bridge = Bridge::new(0);
        let new_oracle = Address::new([0x0D; 20]);
        let id = ProposalId::new("p1");

        assert_eq!(
            bridge.gate.set_oracle(ORACLE, new_oracle),
            Err(GateError::Unauthorized(ORACLE))
        );
        bridge.gate.set_oracle(OWNER, new_oracle).unwrap();
        assert_eq!(bridge.gate.oracle(), new_oracle);

        let request_id = bridge.gate.begin_resolution(&id).await.unwrap();
        assert_eq!(
            bridge.gate.fulfill(ORACLE, request_id, payload_for(1)),
            Err(GateError::UnauthorizedOracle(ORACLE))
        );
        assert!(bridge
            .gate
            .fulfill(new_oracle, request_id, payload_for(1))
            .is_ok());

        assert!(bridge.observer.events().contains(&GateEvent::OracleUpdated {
            previous: ORACLE,
            current: new_oracle,
        }));
    }
}
