//! 경매 상태 머신
//!
//! 상태 전환은 저장소의 잠금 구간 안에서만 호출된다. 타이머 없이 접근 시점에
//! `now >= end_time` 을 검사해 종료를 반영한다(지연 만료).
// region:    --- Imports
use super::model::Auction;
use crate::error::{MarketError, Result};
use crate::money;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
// endregion: --- Imports

/// 경매 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuctionState {
    /// 입찰 가능
    Active,
    /// 종료 시간이 지났지만 아직 반영되지 않음
    ExpiredPending,
    /// 종료 (만료 또는 소유자 비활성화)
    Ended,
}

impl Auction {
    /// 현재 시각 기준 상태
    pub fn state(&self, now: DateTime<Utc>) -> AuctionState {
        if !self.is_active {
            AuctionState::Ended
        } else if now >= self.end_time {
            AuctionState::ExpiredPending
        } else {
            AuctionState::Active
        }
    }

    /// 지연 만료 반영. 이번 호출에서 종료로 전환되었으면 true
    pub fn expire_if_due(&mut self, now: DateTime<Utc>) -> bool {
        if self.state(now) == AuctionState::ExpiredPending {
            self.is_active = false;
            return true;
        }
        false
    }

    /// 입찰 처리
    ///
    /// 검사 순서: 만료 → 금액 형식 → 자기 입찰 → 현재가 이하.
    /// 거절되어도 만료 전환은 `self` 에 남으므로 호출자가 저장해야 한다.
    pub fn place_bid(
        &mut self,
        owner_id: i64,
        bidder_id: i64,
        raw_amount: &str,
        now: DateTime<Utc>,
    ) -> Result<Decimal> {
        self.expire_if_due(now);
        if !self.is_active {
            return Err(MarketError::AuctionEnded);
        }

        let amount = money::parse_bid_amount(raw_amount).ok_or(MarketError::InvalidBid)?;

        if bidder_id == owner_id {
            return Err(MarketError::SelfBid);
        }
        if amount <= self.current_price {
            return Err(MarketError::BidTooLow);
        }

        self.current_price = amount;
        self.highest_bidder_id = Some(bidder_id);
        Ok(amount)
    }

    /// 소유자에 의한 비활성화 (멱등, 재활성화 없음)
    pub fn deactivate(&mut self, owner_id: i64, requester_id: i64) -> Result<()> {
        if requester_id != owner_id {
            return Err(MarketError::NotAuctionOwner);
        }
        self.is_active = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    const OWNER: i64 = 1;
    const ALICE: i64 = 2;
    const BOB: i64 = 3;

    fn auction(start: i64, ends_in: Duration) -> Auction {
        let now = Utc::now();
        Auction {
            id: 10,
            product_id: 20,
            start_price: Decimal::new(start * 100, 2),
            current_price: Decimal::new(start * 100, 2),
            start_time: now,
            end_time: now + ends_in,
            is_active: true,
            highest_bidder_id: None,
        }
    }

    #[test]
    fn full_bidding_scenario() {
        let now = Utc::now();
        let mut a = auction(100, Duration::hours(1));

        assert!(matches!(
            a.place_bid(OWNER, ALICE, "60", now),
            Err(MarketError::BidTooLow)
        ));
        assert_eq!(a.current_price, Decimal::new(10000, 2));

        let accepted = a.place_bid(OWNER, ALICE, "150", now).unwrap();
        assert_eq!(accepted, Decimal::new(15000, 2));
        assert_eq!(a.current_price, Decimal::new(15000, 2));
        assert_eq!(a.highest_bidder_id, Some(ALICE));

        for amount in ["1", "150", "10000"] {
            assert!(matches!(
                a.place_bid(OWNER, OWNER, amount, now),
                Err(MarketError::SelfBid)
            ));
        }

        a.deactivate(OWNER, OWNER).unwrap();
        assert!(!a.is_active);
        assert!(matches!(
            a.place_bid(OWNER, BOB, "500", now),
            Err(MarketError::AuctionEnded)
        ));
        assert_eq!(a.current_price, Decimal::new(15000, 2));
        assert_eq!(a.highest_bidder_id, Some(ALICE));
    }

    #[test]
    fn equal_bid_is_rejected() {
        let now = Utc::now();
        let mut a = auction(100, Duration::hours(1));
        a.place_bid(OWNER, ALICE, "120.50", now).unwrap();

        let before = a.clone();
        assert!(matches!(
            a.place_bid(OWNER, BOB, "120.5", now),
            Err(MarketError::BidTooLow)
        ));
        assert_eq!(a, before);
    }

    #[test]
    fn accepted_prices_strictly_increase() {
        let now = Utc::now();
        let mut a = auction(5, Duration::hours(1));
        let mut last = a.current_price;
        for (i, raw) in ["6", "5.50", "7.25", "7.25", "3", "100", "99.99"].iter().enumerate() {
            let bidder = if i % 2 == 0 { ALICE } else { BOB };
            if let Ok(amount) = a.place_bid(OWNER, bidder, raw, now) {
                assert!(amount > last);
                last = amount;
            }
            assert!(a.current_price >= a.start_price);
            assert_eq!(a.current_price, last);
        }
        assert_eq!(a.current_price, Decimal::new(10000, 2));
    }

    #[test]
    fn malformed_bid_is_invalid() {
        let now = Utc::now();
        let mut a = auction(100, Duration::hours(1));
        for raw in ["", "abc", "-200", "0", "200.001"] {
            assert!(matches!(
                a.place_bid(OWNER, ALICE, raw, now),
                Err(MarketError::InvalidBid)
            ));
        }
        assert_eq!(a.highest_bidder_id, None);
    }

    #[test]
    fn past_end_time_expires_lazily_on_bid() {
        let now = Utc::now();
        let mut a = auction(100, Duration::seconds(-1));
        assert_eq!(a.state(now), AuctionState::ExpiredPending);

        assert!(matches!(
            a.place_bid(OWNER, ALICE, "1000", now),
            Err(MarketError::AuctionEnded)
        ));
        assert!(!a.is_active);
        assert_eq!(a.state(now), AuctionState::Ended);
        assert_eq!(a.current_price, a.start_price);
    }

    #[test]
    fn ended_check_precedes_amount_validation() {
        let now = Utc::now();
        let mut a = auction(100, Duration::seconds(-5));
        assert!(matches!(
            a.place_bid(OWNER, ALICE, "garbage", now),
            Err(MarketError::AuctionEnded)
        ));
    }

    #[test]
    fn expiry_is_reported_once() {
        let now = Utc::now();
        let mut a = auction(1, Duration::zero());
        assert!(a.expire_if_due(now + Duration::seconds(1)));
        assert!(!a.expire_if_due(now + Duration::seconds(2)));
    }

    #[test]
    fn only_owner_deactivates_and_it_is_idempotent() {
        let mut a = auction(100, Duration::hours(1));
        assert!(matches!(
            a.deactivate(OWNER, ALICE),
            Err(MarketError::NotAuctionOwner)
        ));
        assert!(a.is_active);

        a.deactivate(OWNER, OWNER).unwrap();
        a.deactivate(OWNER, OWNER).unwrap();
        assert!(!a.is_active);
    }
}
