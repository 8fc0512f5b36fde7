use shared::{AddFamilyMemberRequest, FamilyMember as SharedMember, FamilyMemberListResponse};

use crate::domain::commands::family::AddFamilyMemberCommand;
use crate::domain::models::family::FamilyMember;

/// Mapper between family member DTOs and the domain type.
pub struct FamilyMapper;

impl FamilyMapper {
    pub fn to_command(request: AddFamilyMemberRequest) -> AddFamilyMemberCommand {
        AddFamilyMemberCommand {
            name: request.name,
            role: request.role,
            avatar: request.avatar,
            is_online: request.is_online,
        }
    }

    pub fn to_dto(member: FamilyMember) -> SharedMember {
        SharedMember {
            id: member.id,
            name: member.name,
            role: member.role,
            is_online: member.is_online,
            last_active: member.last_active,
            avatar: member.avatar,
        }
    }

    pub fn to_list_response(members: Vec<FamilyMember>) -> FamilyMemberListResponse {
        FamilyMemberListResponse {
            members: members.into_iter().map(Self::to_dto).collect(),
        }
    }
}
