use embedded_hal::delay::DelayNs;
use embedded_io::{Read, ReadReady, Write};
use no_std_net::Ipv4Addr;

use crate::{
    command::{
        network_service::{types::OperatorSelectionMode, SetOperatorSelection, SetPreferredMode},
        psn::{
            responses::{GPRSNetworkRegistrationStatus, PDPAddress, PDPContextState},
            types::{GPRSAttachedState, PDPContextStatus, PdpType},
            GetGPRSNetworkRegistrationStatus, GetPDPAddress, GetPDPContextState,
            SetGPRSAttached, SetPDPContextDefinition, SetPDPContextState,
        },
        AtResponse,
    },
    config::CellularConfig,
    error::Error,
    registration::Status,
    sequence::{Pipeline, Step},
    CellularClient,
};

pub trait Gprs {
    /// Register, attach to the packet domain and bring up a PDP context on
    /// `apn`. Returns the IP address assigned by the network.
    fn gprs_connect(&mut self, apn: &str) -> Result<Ipv4Addr, Error>;
}

impl<T, D, C> Gprs for CellularClient<T, D, C>
where
    T: Read + Write + ReadReady,
    D: DelayNs,
    C: CellularConfig,
{
    fn gprs_connect(&mut self, apn: &str) -> Result<Ipv4Addr, Error> {
        const NET: Pipeline = Pipeline::Network;
        self.start(NET);

        self.step(NET, Step::Registration, Self::check_registration)?;

        self.step(NET, Step::PreferredMode, |c| {
            c.expect_ok(&SetPreferredMode {
                mode: C::PREFERRED_MODE,
            })
        })?;

        if C::SELECT_OPERATOR {
            self.step(NET, Step::OperatorSelection, |c| {
                c.expect_ok(&SetOperatorSelection {
                    mode: OperatorSelectionMode::Automatic,
                })
            })?;
        }

        self.step(NET, Step::Attach, |c| {
            c.expect_ok(&SetGPRSAttached {
                state: GPRSAttachedState::Attached,
            })
        })?;

        self.step(NET, Step::ContextDefinition, |c| {
            c.expect_ok(&SetPDPContextDefinition::new(
                C::CONTEXT_ID,
                PdpType::Ip,
                apn,
            )?)
        })?;

        self.step(NET, Step::ContextActivation, Self::activate_context)?;
        let ip = self.step(NET, Step::AddressRetrieval, Self::read_address)?;

        self.finish(NET);
        Ok(ip)
    }
}

impl<T, D, C> CellularClient<T, D, C>
where
    T: Read + Write + ReadReady,
    D: DelayNs,
    C: CellularConfig,
{
    fn check_registration(&mut self) -> Result<(), Error> {
        let resp = self.expect_ok(&GetGPRSNetworkRegistrationStatus)?;
        let status = Status::from(GPRSNetworkRegistrationStatus::from_response(&resp)?.stat);

        if !status.registered() {
            warn!("Not registered: {:?}", status);
            return Err(Error::NotRegistered(status));
        }

        Ok(())
    }

    /// Whether the configured context is already active. A failed query
    /// counts as inactive.
    fn context_active(&mut self) -> bool {
        let resp = match self.expect_ok(&GetPDPContextState) {
            Ok(resp) => resp,
            Err(e) => {
                debug!("Context state query failed: {:?}", e);
                return false;
            }
        };

        let active = resp
            .info_lines(PDPContextState::PREFIX)
            .filter_map(|line| PDPContextState::from_line(line).ok())
            .any(|state| state.cid == C::CONTEXT_ID && state.status == PDPContextStatus::Activated);
        active
    }

    fn activate_context(&mut self) -> Result<(), Error> {
        if self.context_active() {
            debug!("Context {} already active", C::CONTEXT_ID.0);
            return Ok(());
        }

        self.expect_ok(&SetPDPContextState {
            status: PDPContextStatus::Activated,
            cid: C::CONTEXT_ID,
        })?;
        Ok(())
    }

    fn read_address(&mut self) -> Result<Ipv4Addr, Error> {
        let resp = self.expect_ok(&GetPDPAddress { cid: C::CONTEXT_ID })?;

        let address = resp
            .info_lines(PDPAddress::PREFIX)
            .filter_map(|line| PDPAddress::from_line(line).ok())
            .find(|address| address.cid == C::CONTEXT_ID)
            .ok_or(Error::Malformed)?;

        if address.ip.is_unspecified() {
            warn!("No IP address assigned");
            return Err(Error::NoAddress);
        }

        info!("IP address: {:?}", address.ip.octets());
        Ok(address.ip)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        command::network_service::types::NetworkMode,
        command::psn::types::ContextId,
        sequence::Progress,
        test_helpers::{client, FakeModem, NoopDelay},
    };

    const ATTACH: [&str; 8] = [
        "AT+CGREG?",
        "AT+CNMP=38",
        "AT+COPS=0",
        "AT+CGATT=1",
        "AT+CGDCONT=1,\"IP\",\"internet\"",
        "AT+CGACT?",
        "AT+CGACT=1,1",
        "AT+CGPADDR=1",
    ];

    #[test]
    fn connect_ok() {
        let mut client = client(FakeModem::bring_up());

        assert_eq!(
            client.gprs_connect("internet"),
            Ok(Ipv4Addr::new(10, 0, 0, 5))
        );
        assert_eq!(client.network_progress(), Progress::Done);
        assert_eq!(client.at.transport().commands(), &ATTACH[..]);
    }

    #[test]
    fn roaming_accepted() {
        let mut client = client(
            FakeModem::bring_up().on("AT+CGREG?", "\r\n+CGREG: 0,5\r\n\r\nOK\r\n"),
        );
        assert!(client.gprs_connect("internet").is_ok());
    }

    #[test]
    fn unregistered_stops_pipeline() {
        let mut client = client(
            FakeModem::bring_up().on("AT+CGREG?", "\r\n+CGREG: 0,2\r\n\r\nOK\r\n"),
        );

        assert_eq!(
            client.gprs_connect("internet"),
            Err(Error::NotRegistered(Status::Searching))
        );
        assert_eq!(client.network_progress(), Progress::Failed(Step::Registration));
        assert_eq!(client.at.transport().commands(), ["AT+CGREG?"]);
    }

    #[test]
    fn failed_attach_stops_pipeline() {
        let mut client = client(FakeModem::bring_up().on("AT+CGATT=1", "\r\nERROR\r\n"));

        assert_eq!(client.gprs_connect("internet"), Err(Error::Rejected));
        assert_eq!(client.network_progress(), Progress::Failed(Step::Attach));
        assert_eq!(client.at.transport().commands(), &ATTACH[..4]);
    }

    #[test]
    fn active_context_skips_activation() {
        let mut client = client(
            FakeModem::bring_up().on("AT+CGACT?", "\r\n+CGACT: 1,1\r\n+CGACT: 2,0\r\n\r\nOK\r\n"),
        );

        assert!(client.gprs_connect("internet").is_ok());
        assert_eq!(client.at.transport().count("AT+CGACT=1,1"), 0);
    }

    #[test]
    fn other_active_context_does_not_count() {
        let mut client = client(
            FakeModem::bring_up().on("AT+CGACT?", "\r\n+CGACT: 1,0\r\n+CGACT: 2,1\r\n\r\nOK\r\n"),
        );

        assert!(client.gprs_connect("internet").is_ok());
        assert_eq!(client.at.transport().count("AT+CGACT=1,1"), 1);
    }

    #[test]
    fn failed_context_query_still_activates() {
        let mut client = client(FakeModem::bring_up().on("AT+CGACT?", "\r\nERROR\r\n"));

        assert!(client.gprs_connect("internet").is_ok());
        assert_eq!(client.at.transport().count("AT+CGACT=1,1"), 1);
    }

    #[test]
    fn unassigned_address_rejected() {
        let mut client = client(
            FakeModem::bring_up().on("AT+CGPADDR=1", "\r\n+CGPADDR: 1,0.0.0.0\r\n\r\nOK\r\n"),
        );

        assert_eq!(client.gprs_connect("internet"), Err(Error::NoAddress));
        assert_eq!(
            client.network_progress(),
            Progress::Failed(Step::AddressRetrieval)
        );
    }

    #[test]
    fn missing_address_rejected() {
        let mut no_line = client(FakeModem::bring_up().on("AT+CGPADDR=1", "\r\nOK\r\n"));
        assert_eq!(no_line.gprs_connect("internet"), Err(Error::Malformed));

        let mut short = client(
            FakeModem::bring_up().on("AT+CGPADDR=1", "\r\n+CGPADDR: 1,10.0\r\n\r\nOK\r\n"),
        );
        assert_eq!(short.gprs_connect("internet"), Err(Error::Malformed));
    }

    #[test]
    fn apn_too_long_issues_nothing_further() {
        let apn = "a".repeat(100);
        let mut client = client(FakeModem::bring_up());

        assert_eq!(client.gprs_connect(&apn), Err(Error::Overflow));
        assert_eq!(
            client.network_progress(),
            Progress::Failed(Step::ContextDefinition)
        );
        assert_eq!(client.at.transport().commands(), &ATTACH[..4]);
    }

    struct NoOperatorSelection;

    impl CellularConfig for NoOperatorSelection {
        const SELECT_OPERATOR: bool = false;
        const PREFERRED_MODE: NetworkMode = NetworkMode::Automatic;
        const CONTEXT_ID: ContextId = ContextId(2);
    }

    #[test]
    fn configured_attach() {
        let modem = FakeModem::bring_up()
            .on("AT+CNMP=2", "\r\nOK\r\n")
            .on("AT+CGACT=1,2", "\r\nOK\r\n")
            .on("AT+CGPADDR=2", "\r\n+CGPADDR: 2,\"10.1.2.3\"\r\n\r\nOK\r\n");
        let mut client: CellularClient<_, _, NoOperatorSelection> =
            CellularClient::new(modem, NoopDelay);

        assert_eq!(
            client.gprs_connect("iot"),
            Ok(Ipv4Addr::new(10, 1, 2, 3))
        );
        assert_eq!(client.at.transport().count("AT+COPS"), 0);
        assert_eq!(client.at.transport().count("AT+CGDCONT=2,\"IP\",\"iot\""), 1);
    }
}
