//! Call signatures of the membership NFT and DAO contracts.

use alloy_sol_types::sol;

sol! {
    /// Proposal struct as laid out by the DAO contract
    #[derive(Debug, PartialEq, Eq)]
    struct DaoProposal {
        uint256 proposalId;
        address tokenAddress;
        uint256 ethAmount;
        uint256 deadline;
        uint256 yayVotes;
        uint256 nayVotes;
        bool executed;
    }

    interface IMembershipNft {
        function balanceOf(address owner) external view returns (uint256);
    }

    interface IDao {
        function owner() external view returns (address);
        function numProposals() external view returns (uint256);
        function getProposals() external view returns (DaoProposal[] memory);
        function voteProposal(uint256 index, uint8 choice) external;
        function executeProposal(uint256 index) external;
        function createProposal(address token, uint256 amount) external;
    }
}
